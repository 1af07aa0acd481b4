use crate::calculations::{DayBuckets, classify_jobs, organize_jobs_by_date, side_panels};
use crate::calendar::{
    WeekTitle, end_of_window, start_of_week, week_titles, weeks_in_span, window_bounds,
};
use crate::config::BoardConfig;
use crate::job::Job;
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use tracing::warn;

/// Counts reported after a board is rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    pub job_count: usize,
    pub in_calendar_count: usize,
    pub future_count: usize,
    pub skipped_count: usize,
    pub past_train_count: usize,
    pub upcoming_train_count: usize,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
}

impl RefreshSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("jobs={}", self.job_count));
        parts.push(format!("window={}..{}", self.window_start, self.window_end));
        parts.push(format!("calendar={}", self.in_calendar_count));
        if self.future_count > 0 {
            parts.push(format!("future={}", self.future_count));
        }
        if self.skipped_count > 0 {
            parts.push(format!("skipped={}", self.skipped_count));
        }
        if self.past_train_count > 0 {
            parts.push(format!("past_trains={}", self.past_train_count));
        }
        if self.upcoming_train_count > 0 {
            parts.push(format!("upcoming_trains={}", self.upcoming_train_count));
        }
        parts.join(", ")
    }
}

/// Everything the dashboard shows for one refresh cycle.
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub generated_at: DateTime<Local>,
    pub reference_date: NaiveDate,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub week_titles: Vec<WeekTitle>,
    pub day_buckets: DayBuckets,
    pub future_jobs: Vec<Job>,
    pub past_trains: Vec<Job>,
    pub upcoming_trains: Vec<Job>,
    pub job_count: usize,
    pub in_calendar_count: usize,
    pub skipped_count: usize,
}

impl BoardSnapshot {
    /// Board shown before the first fetch completes.
    pub fn empty(config: &BoardConfig, today: NaiveDate) -> Self {
        Board::build(&[], config, today)
    }

    pub fn summary(&self) -> RefreshSummary {
        RefreshSummary {
            job_count: self.job_count,
            in_calendar_count: self.in_calendar_count,
            future_count: self.future_jobs.len(),
            skipped_count: self.skipped_count,
            past_train_count: self.past_trains.len(),
            upcoming_train_count: self.upcoming_trains.len(),
            window_start: self.window_start,
            window_end: self.window_end,
        }
    }

    pub fn bucket(&self, date: NaiveDate) -> Option<&[Job]> {
        self.day_buckets.get(date)
    }
}

pub struct Board;

impl Board {
    /// Classify and bucket `jobs` for the window anchored by `config`.
    ///
    /// `today` is used as the anchor when the config has none or when the
    /// configured anchor cannot hold a full window.
    pub fn build(jobs: &[Job], config: &BoardConfig, today: NaiveDate) -> BoardSnapshot {
        let span = config.span_days();
        let mut reference_date = config.anchor(today);
        if window_bounds(reference_date, span).is_none() {
            warn!(
                anchor = %reference_date,
                fallback = %today,
                "Board anchor is out of range, anchoring on today"
            );
            reference_date = today;
        }
        let window_start = start_of_week(reference_date);
        let window_end = end_of_window(window_start, span);

        let range = classify_jobs(jobs, window_start, window_end);
        let day_buckets = organize_jobs_by_date(&range.in_calendar, window_start, span);
        let panels = side_panels(jobs, reference_date, span);

        BoardSnapshot {
            generated_at: Local::now(),
            reference_date,
            window_start,
            window_end,
            week_titles: week_titles(window_start, weeks_in_span(span)),
            day_buckets,
            future_jobs: range.future_jobs,
            past_trains: panels.past_trains,
            upcoming_trains: panels.upcoming_trains,
            job_count: jobs.len(),
            in_calendar_count: range.in_calendar.len(),
            skipped_count: range.skipped,
        }
    }
}
