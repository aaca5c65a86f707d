//! ASCII bar chart for terminal output.
//!
//! This is intentionally "dumb" (one row per date), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Bar glyphs:
//! - highest value: `+`
//! - lowest value: `-`
//! - everything else: `#`

use crate::domain::PredictionSeries;
use crate::report::fmt_volume;
use crate::stats::extreme_indices;

pub const MAX_GLYPH: char = '+';
pub const MIN_GLYPH: char = '-';
pub const BAR_GLYPH: char = '#';

/// Render one horizontal bar per point, scaled so the largest value spans `width`.
pub fn render_bar_chart(series: &PredictionSeries, width: usize) -> String {
    let Some((max_idx, min_idx)) = extreme_indices(series) else {
        return "No prediction data to plot\n".to_string();
    };
    let width = width.max(10);

    let max_value = series.points[max_idx].value;
    let min_value = series.points[min_idx].value;
    let first = series.points[0].date;
    let last = series.points[series.len() - 1].date;

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {first} .. {last} | n={} | max={} | min={}\n",
        series.len(),
        fmt_volume(max_value),
        fmt_volume(min_value),
    ));

    for (idx, p) in series.points.iter().enumerate() {
        let glyph = if idx == max_idx {
            MAX_GLYPH
        } else if idx == min_idx {
            MIN_GLYPH
        } else {
            BAR_GLYPH
        };
        let bar: String = std::iter::repeat_n(glyph, bar_len(p.value, max_value, width)).collect();
        out.push_str(format!("{} | {bar:<width$} {}", p.date, fmt_volume(p.value)).trim_end());
        out.push('\n');
    }

    out.push_str(&format!(
        "Legend: {MAX_GLYPH} max  {MIN_GLYPH} min  {BAR_GLYPH} others\n"
    ));
    out
}

fn bar_len(value: f64, max_value: f64, width: usize) -> usize {
    if max_value <= 0.0 || value <= 0.0 {
        return 0;
    }
    let u = (value / max_value).clamp(0.0, 1.0);
    (u * width as f64).round() as usize
}
