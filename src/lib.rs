pub mod board;
pub mod calculations;
pub mod calendar;
pub mod config;
pub mod error;
pub mod export;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod job;
pub mod parser;
pub mod refresh;
pub mod source;

pub use board::{Board, BoardSnapshot, RefreshSummary};
pub use calculations::{
    DayBuckets, RangeClassification, SidePanels, classify_jobs, organize_jobs_by_date,
    side_panels,
};
pub use calendar::{
    WeekTitle, add_days, parse_flexible_date, shipping_week, start_of_week, week_titles,
    window_bounds,
};
pub use config::BoardConfig;
pub use error::{ConfigError, ExportError, FetchError};
pub use export::{export_day_buckets_csv, write_day_buckets_csv};
pub use job::{
    Job, JobDetails, JobKind, JobStart, NonStandardDetails, SamplingDetails, TrainDetails,
};
pub use parser::{RawJobRecord, parse_raw_job, parse_raw_jobs, parse_raw_jobs_now, parse_raw_json};
pub use refresh::{BoardState, Refresher};
pub use source::{FileJobSource, HttpJobSource, JobSource, fetch_or_empty};
