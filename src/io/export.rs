//! Export normalized series and run results.
//!
//! The CSV export is meant to be easy to consume in spreadsheets or downstream
//! scripts; the JSON export carries the full run (summary + skipped records).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::app::pipeline::PredictionRun;
use crate::domain::{DateRange, PayloadShape, PredictionPoint, PredictionSeries, SkippedRecord, Summary};
use crate::error::AppError;

/// Write `date,value` rows to a CSV file.
pub fn write_series_csv(path: &Path, series: &PredictionSeries) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "date,value")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for p in &series.points {
        writeln!(file, "{},{}", p.date.format("%Y-%m-%d"), p.value)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    tracing::info!(path = %path.display(), rows = series.len(), "exported series CSV");
    Ok(())
}

#[derive(Debug, Serialize)]
struct RunExport<'a> {
    tool: &'static str,
    title: &'a str,
    range: Option<&'a DateRange>,
    fetched_at: DateTime<Local>,
    shape: PayloadShape,
    points: &'a [PredictionPoint],
    summary: Option<&'a Summary>,
    skipped: &'a [SkippedRecord],
}

/// Write the whole run (points, summary, skipped records) as pretty JSON.
pub fn write_run_json(path: &Path, run: &PredictionRun) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export JSON '{}': {e}", path.display())))?;

    let export = RunExport {
        tool: "tickets",
        title: &run.title,
        range: run.range.as_ref(),
        fetched_at: run.fetched_at,
        shape: run.series.shape,
        points: &run.series.points,
        summary: run.summary.as_ref(),
        skipped: &run.series.skipped,
    };

    serde_json::to_writer_pretty(file, &export)
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))?;

    tracing::info!(path = %path.display(), "exported run JSON");
    Ok(())
}
