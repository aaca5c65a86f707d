//! Plotters-powered prediction bar chart widget for Ratatui.
//!
//! Plotters output is rendered into the Ratatui buffer using
//! `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color as TuiColor, Style},
    widgets::Widget,
};

/// Bar color for ordinary days.
pub const BAR_RGB: (u8, u8, u8) = (11, 110, 253);
/// Bar color for the highest-volume day.
pub const MAX_RGB: (u8, u8, u8) = (255, 77, 77);
/// Bar color for the lowest-volume day.
pub const MIN_RGB: (u8, u8, u8) = (44, 160, 44);

/// A render-only chart description; everything is computed before `render()`.
pub struct PredictionBarChart<'a> {
    /// One bar per point, in date order.
    pub values: &'a [f64],
    /// Short date labels (`%m-%d`), parallel to `values`.
    pub labels: &'a [String],
    pub max_idx: usize,
    pub min_idx: usize,
    pub y_label: &'a str,
}

impl PredictionBarChart<'_> {
    /// Y bounds always include zero so bars grow from a common baseline;
    /// negative values extend the axis below it.
    pub fn y_bounds(&self) -> [f64; 2] {
        let lo = self.values.iter().copied().fold(0.0_f64, f64::min);
        let hi = self.values.iter().copied().fold(0.0_f64, f64::max);
        if !(lo.is_finite() && hi.is_finite()) || hi <= lo {
            return [0.0, 1.0];
        }
        let pad = (hi - lo) * 0.1;
        [
            if lo < 0.0 { lo - pad } else { 0.0 },
            if hi > 0.0 { hi + pad } else { 0.0 },
        ]
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        [-0.5, self.values.len() as f64 - 0.5]
    }

    fn bar_color(&self, idx: usize) -> RGBColor {
        let (r, g, b) = if idx == self.max_idx {
            MAX_RGB
        } else if idx == self.min_idx {
            MIN_RGB
        } else {
            BAR_RGB
        };
        RGBColor(r, g, b)
    }
}

impl Widget for PredictionBarChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(TuiColor::Yellow),
            );
            return;
        }
        if self.values.is_empty() {
            return;
        }

        let [x0, x1] = self.x_bounds();
        let [y0, y1] = self.y_bounds();

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            let labels = self.labels;
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .y_desc(self.y_label)
                .x_labels(labels.len().min(7))
                .y_labels(5)
                .x_label_formatter(&|v| {
                    let idx = v.round();
                    if idx < 0.0 {
                        return String::new();
                    }
                    labels.get(idx as usize).cloned().unwrap_or_default()
                })
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            chart.draw_series(self.values.iter().enumerate().map(|(i, &v)| {
                let x = i as f64;
                Rectangle::new([(x - 0.35, 0.0), (x + 0.35, v)], self.bar_color(i).filled())
            }))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart<'a>(values: &'a [f64], labels: &'a [String]) -> PredictionBarChart<'a> {
        PredictionBarChart {
            values,
            labels,
            max_idx: 1,
            min_idx: 0,
            y_label: "tickets",
        }
    }

    #[test]
    fn bounds_pad_above_the_tallest_bar() {
        let labels = vec!["01-01".to_string(), "01-02".to_string()];
        let c = chart(&[10.0, 40.0], &labels);
        assert_eq!(c.x_bounds(), [-0.5, 1.5]);
        let [lo, hi] = c.y_bounds();
        assert_eq!(lo, 0.0);
        assert!((hi - 44.0).abs() < 1e-9);
    }

    #[test]
    fn all_zero_values_still_have_a_visible_axis() {
        let labels = vec!["01-01".to_string()];
        assert_eq!(chart(&[0.0], &labels).y_bounds(), [0.0, 1.0]);
    }

    #[test]
    fn negative_values_extend_the_axis_below_zero() {
        let labels = vec![String::new(); 3];
        let c = chart(&[-10.0, 30.0, 5.0], &labels);
        let [lo, hi] = c.y_bounds();
        assert!((lo + 14.0).abs() < 1e-9, "{lo}");
        assert!((hi - 34.0).abs() < 1e-9, "{hi}");

        let [lo, hi] = chart(&[-4.0, -2.0], &labels[..2]).y_bounds();
        assert!(lo < -4.0);
        assert_eq!(hi, 0.0);
    }

    #[test]
    fn extremes_get_highlight_colors() {
        let labels = vec![String::new(); 3];
        let c = PredictionBarChart {
            values: &[5.0, 9.0, 1.0],
            labels: &labels,
            max_idx: 1,
            min_idx: 2,
            y_label: "tickets",
        };
        assert_eq!(c.bar_color(0), RGBColor(BAR_RGB.0, BAR_RGB.1, BAR_RGB.2));
        assert_eq!(c.bar_color(1), RGBColor(MAX_RGB.0, MAX_RGB.1, MAX_RGB.2));
        assert_eq!(c.bar_color(2), RGBColor(MIN_RGB.0, MIN_RGB.1, MIN_RGB.2));

        let style = c.bar_color(1).filled();
        assert!(style.filled);
    }
}
