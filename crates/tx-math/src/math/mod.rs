//! Core math modules.

pub mod stable;
pub mod beta;
pub mod moments;
pub mod student;
pub mod interval;
pub mod ttest;
