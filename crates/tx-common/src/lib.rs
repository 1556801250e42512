//! Txstat common types: transaction records, errors, and configuration.

pub mod config;
pub mod error;
pub mod record;

pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use record::Transaction;
