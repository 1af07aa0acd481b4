use crate::calendar::{add_days, end_of_window};
use crate::job::Job;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Ordered jobs per calendar day of the displayed window, keyed by date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DayBuckets {
    buckets: BTreeMap<NaiveDate, Vec<Job>>,
}

impl DayBuckets {
    pub fn get(&self, date: NaiveDate) -> Option<&[Job]> {
        self.buckets.get(&date).map(Vec::as_slice)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.buckets.contains_key(&date)
    }

    /// Number of days (buckets), not jobs.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.buckets.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[Job])> + '_ {
        self.buckets
            .iter()
            .map(|(date, jobs)| (*date, jobs.as_slice()))
    }

    /// Total bucket entries; a multi-day job counts once per day.
    pub fn entry_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// Spread jobs over one bucket per day of `[start, start + span_days - 1]`.
///
/// Each active day of a job (its start through its end, clamped to the
/// window end) lands in the bucket for the *following* day. Jobs without a
/// usable start date are ignored.
pub fn organize_jobs_by_date(jobs: &[Job], start: NaiveDate, span_days: u32) -> DayBuckets {
    let window_end = end_of_window(start, span_days);
    let mut buckets: BTreeMap<NaiveDate, Vec<Job>> = (0..i64::from(span_days.max(1)))
        .map(|offset| (add_days(start, offset), Vec::new()))
        .collect();

    // Days before this one cannot shift into the window.
    let earliest_useful = add_days(start, -1);

    for job in jobs {
        let Some(job_start) = job.start_date() else {
            continue;
        };
        let last_day = job.end_date.min(window_end);
        let mut current = job_start.max(earliest_useful);

        while current <= last_day {
            let Some(key) = current.succ_opt() else {
                break;
            };
            if let Some(bucket) = buckets.get_mut(&key) {
                bucket.push(job.clone());
            }
            current = key;
        }
    }

    for bucket in buckets.values_mut() {
        bucket.sort_by(compare_in_bucket);
    }

    DayBuckets { buckets }
}

/// Trains first, then sampling, then everything else; earlier starts first.
fn compare_in_bucket(a: &Job, b: &Job) -> Ordering {
    b.kind()
        .priority()
        .cmp(&a.kind().priority())
        .then_with(|| a.start_date().cmp(&b.start_date()))
}
