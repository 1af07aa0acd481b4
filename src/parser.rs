use crate::calendar::parse_flexible_date;
use crate::job::{
    Job, JobDetails, JobStart, NonStandardDetails, SamplingDetails, TrainDetails, UNASSIGNED,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Start date value meaning "moved, no new date yet".
pub const PUSHED_SENTINEL: &str = "Pushed";

/// Job identifier marking a sampling job.
pub const SAMPLING_MARKER: &str = "SPL";

/// One record as delivered by the schedule feed.
///
/// Every field is optional and kept as raw JSON so that a number where text is
/// expected (or the reverse) never rejects the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawJobRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Value>,
    #[serde(rename = "CarNo", default, skip_serializing_if = "Option::is_none")]
    pub car_no: Option<Value>,
    #[serde(rename = "Commodity", default, skip_serializing_if = "Option::is_none")]
    pub commodity: Option<Value>,
    #[serde(rename = "Container", default, skip_serializing_if = "Option::is_none")]
    pub container: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned: Option<Value>,
    #[serde(rename = "startDate", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Value>,
    #[serde(rename = "endDate", default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Value>,
}

/// Decode a JSON array of raw records.
pub fn parse_raw_json(text: &str) -> Result<Vec<RawJobRecord>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Normalize every record, keeping input order. Never drops a record.
///
/// `today` stands in for jobs that carry neither an end date nor a usable
/// start date.
pub fn parse_raw_jobs(records: &[RawJobRecord], today: NaiveDate) -> Vec<Job> {
    records
        .iter()
        .map(|record| parse_raw_job(record, today))
        .collect()
}

pub fn parse_raw_jobs_now(records: &[RawJobRecord]) -> Vec<Job> {
    parse_raw_jobs(records, Local::now().date_naive())
}

pub fn parse_raw_job(record: &RawJobRecord, today: NaiveDate) -> Job {
    let start = resolve_start(record.start_date.as_ref());
    let end_date = record
        .end_date
        .as_ref()
        .and_then(value_text)
        .and_then(|text| parse_flexible_date(&text))
        .or_else(|| start.date())
        .unwrap_or(today);
    let inspector = record
        .assigned
        .as_ref()
        .and_then(value_text)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNASSIGNED.to_string());

    let details = match classify_identifier(record.job.as_ref()) {
        Identifier::Train(job_number) => JobDetails::Train(TrainDetails {
            job_number,
            customer: text_or_empty(&record.client),
            site_location: text_or_empty(&record.location),
            car_count: text_or_empty(&record.car_no),
            commodity_type: text_or_empty(&record.commodity),
            test_list: join_tests(record.tests.as_ref()),
        }),
        Identifier::Sampling => JobDetails::Sampling(SamplingDetails {
            customer: text_or_empty(&record.client),
            location: text_or_empty(&record.location),
            container_count: text_or_empty(&record.car_no),
            container_type: text_or_empty(&record.container),
            test_list: join_tests(record.tests.as_ref()),
        }),
        Identifier::Other(description) => JobDetails::NonStandard(NonStandardDetails {
            description,
            client: text_or_empty(&record.client),
        }),
    };

    Job {
        start,
        end_date,
        inspector,
        details,
    }
}

enum Identifier {
    Train(String),
    Sampling,
    Other(String),
}

/// Train wins over sampling: a numeric identifier is always a train.
fn classify_identifier(job: Option<&Value>) -> Identifier {
    let Some(text) = job.and_then(value_text) else {
        return Identifier::Other(String::new());
    };
    if has_leading_integer(&text) {
        Identifier::Train(text)
    } else if text == SAMPLING_MARKER {
        Identifier::Sampling
    } else {
        Identifier::Other(text)
    }
}

/// True when the text starts (after whitespace) with an optionally signed run
/// of ASCII digits, the way job numbers such as "4521" or "4521-B" are written.
pub fn has_leading_integer(text: &str) -> bool {
    let trimmed = text.trim_start();
    let digits = trimmed
        .strip_prefix(['+', '-'])
        .unwrap_or(trimmed);
    digits.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn resolve_start(value: Option<&Value>) -> JobStart {
    let Some(text) = value.and_then(value_text) else {
        return JobStart::Tbd;
    };
    if text.is_empty() || text == PUSHED_SENTINEL {
        return JobStart::Tbd;
    }
    match parse_flexible_date(&text) {
        Some(date) => JobStart::Scheduled(date),
        None => JobStart::Unparsed(text),
    }
}

fn join_tests(value: Option<&Value>) -> String {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(value_text)
            .collect::<Vec<_>>()
            .join(", ")
            .trim()
            .to_string(),
        _ => String::new(),
    }
}

fn text_or_empty(value: &Option<Value>) -> String {
    value.as_ref().and_then(value_text).unwrap_or_default()
}

/// Scalar JSON as text; `null`, arrays and objects have no text form.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
