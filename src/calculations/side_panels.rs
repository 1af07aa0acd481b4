use crate::calendar::{end_of_window, start_of_week};
use crate::job::Job;
use chrono::NaiveDate;
use serde::Serialize;

/// Train lists shown beside the grid.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SidePanels {
    /// Trains that started before the current week.
    pub past_trains: Vec<Job>,
    /// Trains with no usable start date or starting after next week.
    pub upcoming_trains: Vec<Job>,
}

/// Sort trains into the past and upcoming panels relative to `reference`.
///
/// Trains starting inside the displayed span (from the Sunday of `reference`)
/// appear in neither panel, and non-train jobs are never listed.
pub fn side_panels(jobs: &[Job], reference: NaiveDate, span_days: u32) -> SidePanels {
    let week_start = start_of_week(reference);
    let week_end = end_of_window(week_start, span_days);
    let mut panels = SidePanels::default();

    for job in jobs.iter().filter(|job| job.as_train().is_some()) {
        match job.start_date() {
            Some(start) if start < week_start => panels.past_trains.push(job.clone()),
            Some(start) if start > week_end => panels.upcoming_trains.push(job.clone()),
            Some(_) => {}
            None => panels.upcoming_trains.push(job.clone()),
        }
    }

    panels
}
