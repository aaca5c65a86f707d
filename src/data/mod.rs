//! Data sources: the upstream prediction API.

pub mod api;

pub use api::{PredictionClient, PredictionSource, endpoint_url, error_payload};
