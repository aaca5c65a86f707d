//! Input/output helpers.
//!
//! - series/run exports (CSV/JSON) (`export`)
//! - saved payload reading (`payload`)

pub mod export;
pub mod payload;

pub use export::*;
pub use payload::*;
