use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

/// Label shown wherever a job has no confirmed start date.
pub const TBD_LABEL: &str = "TBD";

/// Inspector used when a record has no `assigned` value.
pub const UNASSIGNED: &str = "Unassigned";

/// Start date of a job as it arrived in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStart {
    Scheduled(NaiveDate),
    /// No start date yet (field absent or "Pushed").
    Tbd,
    /// A start date was given but could not be read.
    Unparsed(String),
}

impl JobStart {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            JobStart::Scheduled(date) => Some(*date),
            JobStart::Tbd | JobStart::Unparsed(_) => None,
        }
    }

    pub fn is_tbd(&self) -> bool {
        matches!(self, JobStart::Tbd)
    }
}

impl fmt::Display for JobStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStart::Scheduled(date) => write!(f, "{date}"),
            JobStart::Tbd => f.write_str(TBD_LABEL),
            JobStart::Unparsed(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for JobStart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Train,
    Sampling,
    NonStandard,
}

impl JobKind {
    /// Ordering weight inside a day bucket; higher sorts first.
    pub fn priority(self) -> u8 {
        match self {
            JobKind::Train => 3,
            JobKind::Sampling => 2,
            JobKind::NonStandard => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobKind::Train => "train",
            JobKind::Sampling => "sampling",
            JobKind::NonStandard => "non_standard",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainDetails {
    pub job_number: String,
    pub customer: String,
    pub site_location: String,
    pub car_count: String,
    pub commodity_type: String,
    pub test_list: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SamplingDetails {
    pub customer: String,
    pub location: String,
    pub container_count: String,
    pub container_type: String,
    pub test_list: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NonStandardDetails {
    pub description: String,
    pub client: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobDetails {
    Train(TrainDetails),
    Sampling(SamplingDetails),
    NonStandard(NonStandardDetails),
}

/// A normalized job. Built once per refresh cycle and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub start: JobStart,
    pub end_date: NaiveDate,
    pub inspector: String,
    #[serde(flatten)]
    pub details: JobDetails,
}

impl Job {
    pub fn kind(&self) -> JobKind {
        match self.details {
            JobDetails::Train(_) => JobKind::Train,
            JobDetails::Sampling(_) => JobKind::Sampling,
            JobDetails::NonStandard(_) => JobKind::NonStandard,
        }
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start.date()
    }

    pub fn as_train(&self) -> Option<&TrainDetails> {
        match &self.details {
            JobDetails::Train(train) => Some(train),
            _ => None,
        }
    }

    /// One-line heading used by text and CSV output.
    pub fn title(&self) -> String {
        match &self.details {
            JobDetails::Train(t) => {
                format!("{} {} - {}", t.job_number, t.customer, t.site_location)
            }
            JobDetails::Sampling(s) => format!("{} {}", s.customer, s.location)
                .trim()
                .to_string(),
            JobDetails::NonStandard(n) => {
                format!("{} {}", n.description, n.client).trim().to_string()
            }
        }
    }

    /// Secondary line: car/container counts and the test list.
    pub fn detail(&self) -> String {
        match &self.details {
            JobDetails::Train(t) => {
                let mut line = format!("{} cars - {}", t.car_count, t.commodity_type);
                if !t.test_list.trim().is_empty() {
                    line.push_str("; ");
                    line.push_str(&t.test_list);
                }
                line
            }
            JobDetails::Sampling(s) => {
                let mut line = format!("{} - {}", s.container_count, s.container_type);
                if !s.test_list.trim().is_empty() {
                    line.push_str("; ");
                    line.push_str(&s.test_list);
                }
                line
            }
            JobDetails::NonStandard(_) => String::new(),
        }
    }
}
