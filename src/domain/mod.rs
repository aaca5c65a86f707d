//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - normalized forecast points and series (`PredictionPoint`, `PredictionSeries`)
//! - derived statistics (`Summary`)
//! - date windows and presets (`DateRange`, `QuickPreset`)
//! - the user's request (`PredictionQuery`)

pub mod presets;
pub mod query;
pub mod types;

pub use presets::*;
pub use query::*;
pub use types::*;
