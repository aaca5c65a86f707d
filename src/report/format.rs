//! Formatted terminal output for prediction runs.
//!
//! We keep formatting code in one place so:
//! - the normalization code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::PredictionRun;
use crate::domain::{PredictionSeries, Summary};

/// Skipped records listed in the run header before eliding the rest.
const MAX_SKIPPED_SHOWN: usize = 5;

/// Format the run header (what was asked, what came back).
pub fn format_run_summary(run: &PredictionRun) -> String {
    let mut out = String::new();

    out.push_str("=== tickets - Ticket Volume Predictions ===\n");
    out.push_str(&format!("Title: {}\n", run.title));
    if let Some(range) = &run.range {
        out.push_str(&format!("Range: {range} ({} days)\n", range.days()));
    }
    out.push_str(&format!("Fetched: {}\n", run.fetched_at.format("%Y-%m-%d %H:%M:%S")));
    out.push_str(&format!("Payload: {}\n", describe_payload(&run.series)));
    out.push_str(&format!(
        "Points: n={} | skipped={}\n",
        run.series.len(),
        run.series.skipped_count()
    ));

    for skipped in run.series.skipped.iter().take(MAX_SKIPPED_SHOWN) {
        out.push_str(&format!("  (skipped #{}) {}\n", skipped.index, skipped.reason));
    }
    if run.series.skipped_count() > MAX_SKIPPED_SHOWN {
        out.push_str(&format!(
            "  ... and {} more\n",
            run.series.skipped_count() - MAX_SKIPPED_SHOWN
        ));
    }

    out
}

/// Human-readable payload layout, including inferred fields for records.
pub fn describe_payload(series: &PredictionSeries) -> String {
    let shape = series.shape.display_name();
    match &series.fields {
        Some(fields) => format!(
            "{shape} (date={}, value={})",
            fields.date_field.as_deref().unwrap_or("-"),
            fields.value_field.as_deref().unwrap_or("-"),
        ),
        None => shape.to_string(),
    }
}

/// Format the metric/value summary table.
pub fn format_summary_table(summary: &Summary) -> String {
    let rows = [
        ("Total Tickets", fmt_volume(summary.total)),
        ("Max Tickets", fmt_volume(summary.max.value)),
        ("Max Tickets Date", summary.max.date.to_string()),
        ("Min Tickets", fmt_volume(summary.min.value)),
        ("Min Tickets Date", summary.min.date.to_string()),
        ("Mean Tickets", format!("{:.2}", summary.mean)),
    ];

    let mut out = String::new();
    out.push_str(format!("{:<18} {:>12}", "Metric", "Value").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<18} {:-<12}", "", "").trim_end());
    out.push('\n');
    for (metric, value) in rows {
        out.push_str(format!("{metric:<18} {value:>12}").trim_end());
        out.push('\n');
    }
    out
}

/// Format one row per date.
pub fn format_series_table(series: &PredictionSeries) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<12} {:>10}", "date", "value").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<12} {:-<10}", "", "").trim_end());
    out.push('\n');
    for p in &series.points {
        out.push_str(format!("{:<12} {:>10}", p.date.to_string(), fmt_volume(p.value)).trim_end());
        out.push('\n');
    }
    out
}

/// Ticket counts display as whole numbers, halves rounded away from zero.
pub fn fmt_volume(v: f64) -> String {
    let rounded = v.round();
    // `-0.4` rounds to `-0`; show it as `0`.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.0}")
}
