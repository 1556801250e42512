//! Txstat math utilities.

pub mod math;

pub use math::stable::*;
pub use math::beta::*;
pub use math::moments::*;
pub use math::student::*;
pub use math::interval::*;
pub use math::ttest::*;
