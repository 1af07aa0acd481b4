use crate::job::Job;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

/// Jobs split against the displayed window.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RangeClassification {
    pub in_calendar: Vec<Job>,
    pub future_jobs: Vec<Job>,
    /// Jobs left out because they have no usable start date.
    pub skipped: usize,
}

/// Partition jobs into those that start after `end` and everything else.
///
/// Jobs without a usable start date belong to neither side; each one is
/// logged and counted in `skipped`.
pub fn classify_jobs(jobs: &[Job], start: NaiveDate, end: NaiveDate) -> RangeClassification {
    let mut result = RangeClassification::default();

    for job in jobs {
        let Some(job_start) = job.start_date() else {
            warn!(
                kind = %job.kind(),
                start = %job.start,
                title = %job.title(),
                "Invalid start date for job, leaving it off the calendar"
            );
            result.skipped += 1;
            continue;
        };

        if job_start > end {
            result.future_jobs.push(job.clone());
        } else {
            result.in_calendar.push(job.clone());
        }
    }

    tracing::debug!(
        window_start = %start,
        window_end = %end,
        in_calendar = result.in_calendar.len(),
        future = result.future_jobs.len(),
        skipped = result.skipped,
        "Classified jobs against window"
    );
    result
}
