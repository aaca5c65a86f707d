//! What the user asked for, and how that turns into an API request.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{DateRange, QuickPreset};
use crate::error::ErrorReason;

/// Path serving explicit `startdate`/`enddate` range queries.
pub const RANGE_PATH: &str = "predictions";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionQuery {
    Preset(QuickPreset),
    Range(DateRange),
}

/// Path + query parameters for one GET against the prediction API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiRequest {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl PredictionQuery {
    pub fn request(&self) -> ApiRequest {
        match self {
            PredictionQuery::Preset(preset) => ApiRequest {
                path: preset.api_path().to_string(),
                params: Vec::new(),
            },
            PredictionQuery::Range(range) => ApiRequest {
                path: RANGE_PATH.to_string(),
                params: vec![
                    ("startdate".to_string(), range.start.format("%Y-%m-%d").to_string()),
                    ("enddate".to_string(), range.end.format("%Y-%m-%d").to_string()),
                ],
            },
        }
    }

    pub fn title(&self) -> String {
        match self {
            PredictionQuery::Preset(preset) => format!("{} - Ticket Volumes", preset.display_name()),
            PredictionQuery::Range(range) => format!("Range: {} - {}", range.start, range.end),
        }
    }

    /// Window the query covers as seen from `today`.
    pub fn range(&self, today: NaiveDate) -> Result<DateRange, ErrorReason> {
        match self {
            PredictionQuery::Preset(preset) => preset.range(today),
            PredictionQuery::Range(range) => Ok(*range),
        }
    }
}
