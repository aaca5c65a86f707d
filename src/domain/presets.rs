//! Quick date-window presets and range builders.
//!
//! Weekdays are indexed Monday = 0 … Sunday = 6, so "This Week" always ends on
//! the Sunday of the current week.

use chrono::{Datelike, Days, NaiveDate};

use crate::domain::DateRange;
use crate::error::ErrorReason;

/// Largest accepted manual day count.
pub const MAX_NEXT_DAYS: u32 = 365;

/// Named date-window shorthand offered in place of manual date entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuickPreset {
    Tomorrow,
    Next2Days,
    Next7Days,
    ThisWeek,
    ThisMonth,
    Next30Days,
}

impl QuickPreset {
    pub const ALL: [QuickPreset; 6] = [
        QuickPreset::Tomorrow,
        QuickPreset::Next2Days,
        QuickPreset::Next7Days,
        QuickPreset::ThisWeek,
        QuickPreset::ThisMonth,
        QuickPreset::Next30Days,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            QuickPreset::Tomorrow => "Tomorrow",
            QuickPreset::Next2Days => "Next 2 Days",
            QuickPreset::Next7Days => "Next 7 Days",
            QuickPreset::ThisWeek => "This Week",
            QuickPreset::ThisMonth => "This Month",
            QuickPreset::Next30Days => "Next 30 Days",
        }
    }

    /// Kebab-case form used on the command line (`next-7-days`).
    pub fn slug(self) -> &'static str {
        match self {
            QuickPreset::Tomorrow => "tomorrow",
            QuickPreset::Next2Days => "next-2-days",
            QuickPreset::Next7Days => "next-7-days",
            QuickPreset::ThisWeek => "this-week",
            QuickPreset::ThisMonth => "this-month",
            QuickPreset::Next30Days => "next-30-days",
        }
    }

    /// Upstream endpoint serving this preset, relative to the API base.
    pub fn api_path(self) -> &'static str {
        match self {
            QuickPreset::Tomorrow => "predictions/next/1",
            QuickPreset::Next2Days => "predictions/next_2_days",
            QuickPreset::Next7Days => "predictions/next_week",
            QuickPreset::ThisWeek => "predictions/this_week",
            QuickPreset::ThisMonth => "predictions/this_month",
            QuickPreset::Next30Days => "predictions/next_month",
        }
    }

    /// Look up a preset by display name or slug (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self, ErrorReason> {
        let wanted = name.trim();
        QuickPreset::ALL
            .into_iter()
            .find(|p| p.display_name().eq_ignore_ascii_case(wanted) || p.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ErrorReason::InvalidPreset(wanted.to_string()))
    }

    /// Inclusive window covered by this preset relative to `today`.
    pub fn range(self, today: NaiveDate) -> Result<DateRange, ErrorReason> {
        let (start, end) = match self {
            QuickPreset::Tomorrow => (shift(today, 1)?, shift(today, 1)?),
            QuickPreset::Next2Days => (shift(today, 1)?, shift(today, 2)?),
            QuickPreset::Next7Days => (shift(today, 1)?, shift(today, 7)?),
            QuickPreset::ThisWeek => {
                let weekday = u64::from(today.weekday().num_days_from_monday());
                (today, shift(today, 6 - weekday)?)
            }
            QuickPreset::ThisMonth => (first_of_month(today), last_of_month(today)?),
            QuickPreset::Next30Days => (today, shift(today, 30)?),
        };
        DateRange::new(start, end)
    }

    pub fn next(self) -> Self {
        let idx = self.index();
        QuickPreset::ALL[(idx + 1) % QuickPreset::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = self.index();
        QuickPreset::ALL[(idx + QuickPreset::ALL.len() - 1) % QuickPreset::ALL.len()]
    }

    pub fn index(self) -> usize {
        QuickPreset::ALL
            .iter()
            .position(|p| *p == self)
            .unwrap_or(0)
    }
}

impl std::fmt::Display for QuickPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Map a preset name to its inclusive `(start, end)` window.
pub fn map_preset(name: &str, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), ErrorReason> {
    let range = QuickPreset::from_name(name)?.range(today)?;
    Ok((range.start, range.end))
}

/// `[today, today + days]` for the manual day-count control.
pub fn next_days(days: u32, today: NaiveDate) -> Result<DateRange, ErrorReason> {
    if !(1..=MAX_NEXT_DAYS).contains(&days) {
        return Err(ErrorReason::InvalidDateRange(format!(
            "Number of days must be between 1 and {MAX_NEXT_DAYS} (got {days})"
        )));
    }
    DateRange::new(today, shift(today, u64::from(days))?)
}

fn shift(date: NaiveDate, days: u64) -> Result<NaiveDate, ErrorReason> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| ErrorReason::InvalidDateRange(format!("{date} + {days} days is out of range")))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(date: NaiveDate) -> Result<NaiveDate, ErrorReason> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| ErrorReason::InvalidDateRange(format!("No month end for {date}")))
}
