use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of days in the displayed grid (current week plus next week).
pub const DEFAULT_SPAN_DAYS: u32 = 14;

/// Week number given to the stub days between Aug 1 and the first shipping Sunday.
pub const STUB_SHIPPING_WEEK: u32 = 52;

const FISCAL_MONTH: u32 = 8;

/// Header for one displayed week of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekTitle {
    pub shipping_week: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

/// The Sunday at or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let back = i64::from(date.weekday().num_days_from_sunday());
    add_days(date, -back)
}

/// `date` moved by `days`, saturating at the ends of the representable range.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    checked_add_days(date, days).unwrap_or(if days < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

pub fn checked_add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let step = Days::new(days.unsigned_abs());
    if days < 0 {
        date.checked_sub_days(step)
    } else {
        date.checked_add_days(step)
    }
}

/// First and last day of the grid anchored at `anchor`, or `None` when the
/// grid (plus the day before it and a trailing week) falls outside the
/// representable date range.
pub fn window_bounds(anchor: NaiveDate, span_days: u32) -> Option<(NaiveDate, NaiveDate)> {
    let back = i64::from(anchor.weekday().num_days_from_sunday());
    let start = checked_add_days(anchor, -back)?;
    let end = checked_add_days(start, i64::from(span_days.max(1)) - 1)?;
    checked_add_days(start, -1)?;
    checked_add_days(end, 7)?;
    Some((start, end))
}

/// Last day (inclusive) of a window of `span_days` starting at `start`.
pub fn end_of_window(start: NaiveDate, span_days: u32) -> NaiveDate {
    add_days(start, i64::from(span_days.max(1)) - 1)
}

/// First Sunday on or after Aug 1 of the fiscal year containing `date`.
pub fn shipping_year_start(date: NaiveDate) -> NaiveDate {
    let mut year = date.year();
    if date.month() < FISCAL_MONTH {
        year -= 1;
    }
    // Aug 1 exists in every year chrono can represent.
    let anchor = NaiveDate::from_ymd_opt(year, FISCAL_MONTH, 1).unwrap_or(date);
    let forward = (7 - anchor.weekday().num_days_from_sunday()) % 7;
    add_days(anchor, forward as i64)
}

/// Fiscal shipping week of `date`.
///
/// Weeks count from 1 starting at the first Sunday on or after Aug 1. Days
/// between Aug 1 and that Sunday still belong to the previous season and are
/// labelled [`STUB_SHIPPING_WEEK`].
pub fn shipping_week(date: NaiveDate) -> u32 {
    let season_start = shipping_year_start(date);
    let elapsed = (date - season_start).num_days();
    if elapsed >= 0 {
        (elapsed / 7) as u32 + 1
    } else {
        STUB_SHIPPING_WEEK
    }
}

/// Parse `MM/DD/YYYY` (when the text contains `/`) or `YYYY-MM-DD`.
///
/// Anything that is not exactly three numeric components forming a real
/// calendar date yields `None`.
pub fn parse_flexible_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (year, month, day) = if text.contains('/') {
        let parts: Vec<&str> = text.split('/').collect();
        if parts.len() != 3 {
            return None;
        }
        (parts[2], parts[0], parts[1])
    } else {
        let parts: Vec<&str> = text.split('-').collect();
        if parts.len() != 3 {
            return None;
        }
        (parts[0], parts[1], parts[2])
    };

    let year: i32 = year.trim().parse().ok()?;
    let month: u32 = month.trim().parse().ok()?;
    let day: u32 = day.trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Titles for `weeks` consecutive weeks starting at `window_start`.
pub fn week_titles(window_start: NaiveDate, weeks: u32) -> Vec<WeekTitle> {
    (0..weeks)
        .map(|idx| {
            let start = add_days(window_start, i64::from(idx) * 7);
            let end = add_days(start, 6);
            let shipping_week = shipping_week(start);
            let label = format!(
                "Shipping week {} ({} → {})",
                shipping_week,
                start.format("%b %d"),
                end.format("%b %d")
            );
            WeekTitle {
                shipping_week,
                start,
                end,
                label,
            }
        })
        .collect()
}

/// Number of week rows needed to show `span_days`.
pub fn weeks_in_span(span_days: u32) -> u32 {
    span_days.max(1).div_ceil(7)
}
