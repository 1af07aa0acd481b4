pub mod day_buckets;
pub mod range;
pub mod side_panels;

pub use day_buckets::{DayBuckets, organize_jobs_by_date};
pub use range::{RangeClassification, classify_jobs};
pub use side_panels::{SidePanels, side_panels};
