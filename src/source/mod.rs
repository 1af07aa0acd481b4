use crate::error::{FetchError, FetchResult};
use crate::parser::{RawJobRecord, parse_raw_json};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub mod http;

pub use http::HttpJobSource;

/// Where raw job records come from.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch(&self) -> FetchResult<Vec<RawJobRecord>>;

    /// Short human-readable origin, used in logs.
    fn describe(&self) -> String;
}

/// Reads a JSON array of job records from a local file.
#[derive(Debug, Clone)]
pub struct FileJobSource {
    path: PathBuf,
}

impl FileJobSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> FetchResult<Vec<RawJobRecord>> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| FetchError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        parse_raw_json(&text).map_err(|err| FetchError::Decode {
            origin: self.path.display().to_string(),
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl JobSource for FileJobSource {
    async fn fetch(&self) -> FetchResult<Vec<RawJobRecord>> {
        self.read()
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Fetch once; on failure log it and yield an empty list for this cycle.
pub async fn fetch_or_empty(source: &dyn JobSource) -> Vec<RawJobRecord> {
    match source.fetch().await {
        Ok(records) => {
            info!(
                source = %source.describe(),
                count = records.len(),
                "Fetched job records"
            );
            records
        }
        Err(err) => {
            error!(
                source = %source.describe(),
                error = %err,
                "Failed to fetch jobs, showing an empty board until the next refresh"
            );
            Vec::new()
        }
    }
}
