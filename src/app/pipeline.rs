//! Shared "prediction pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch -> normalize -> summarize
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use chrono::{DateTime, Local, NaiveDate};
use serde_json::Value;

use crate::data::PredictionSource;
use crate::domain::{DateRange, PredictionQuery, PredictionSeries, Summary};
use crate::error::ErrorReason;
use crate::normalize::normalize_at;
use crate::stats::summarize;

/// All computed outputs of a single prediction request.
#[derive(Debug, Clone)]
pub struct PredictionRun {
    pub title: String,
    /// `None` for offline runs over a saved payload.
    pub query: Option<PredictionQuery>,
    pub range: Option<DateRange>,
    pub fetched_at: DateTime<Local>,
    pub payload: Value,
    pub series: PredictionSeries,
    /// `None` when the series is empty ("nothing to plot").
    pub summary: Option<Summary>,
}

impl PredictionRun {
    pub fn has_data(&self) -> bool {
        self.summary.is_some()
    }
}

/// Fetch, normalize and summarize one query.
pub fn run_query(
    source: &dyn PredictionSource,
    query: &PredictionQuery,
    today: NaiveDate,
) -> Result<PredictionRun, ErrorReason> {
    // Range validation happens before any network call.
    let range = query.range(today)?;
    let payload = source.fetch(&query.request());

    let mut run = run_payload(query.title(), payload, today)?;
    run.query = Some(*query);
    run.range = Some(range);
    Ok(run)
}

/// Normalize and summarize a payload that is already in hand.
pub fn run_payload(title: String, payload: Value, today: NaiveDate) -> Result<PredictionRun, ErrorReason> {
    let series = normalize_at(&payload, today)?;

    let summary = match summarize(&series) {
        Ok(summary) => Some(summary),
        Err(ErrorReason::EmptySeries) => None,
        Err(other) => return Err(other),
    };

    Ok(PredictionRun {
        title,
        query: None,
        range: None,
        fetched_at: Local::now(),
        payload,
        series,
        summary,
    })
}
