//! Reporting utilities: formatted terminal output for prediction runs.

pub mod format;

pub use format::*;
