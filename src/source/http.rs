use super::JobSource;
use crate::config::BoardConfig;
use crate::error::{FetchError, FetchResult};
use crate::parser::RawJobRecord;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the schedule JSON over HTTP, trying a fallback URL once.
#[derive(Debug, Clone)]
pub struct HttpJobSource {
    primary_url: String,
    fallback_url: Option<String>,
    client: reqwest::Client,
}

impl HttpJobSource {
    pub fn new(primary_url: impl Into<String>, fallback_url: Option<String>) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            primary_url: primary_url.into(),
            fallback_url: fallback_url.filter(|url| !url.trim().is_empty()),
            client,
        })
    }

    pub fn from_config(config: &BoardConfig) -> FetchResult<Self> {
        Self::new(
            config.primary_url.clone(),
            Some(config.fallback_url.clone()),
        )
    }

    pub fn primary_url(&self) -> &str {
        &self.primary_url
    }

    pub fn fallback_url(&self) -> Option<&str> {
        self.fallback_url.as_deref()
    }

    async fn fetch_url(&self, url: &str) -> FetchResult<Vec<RawJobRecord>> {
        debug!(url, "Requesting job list");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response
            .json::<Vec<RawJobRecord>>()
            .await
            .map_err(|err| FetchError::Decode {
                origin: url.to_string(),
                message: err.to_string(),
            })
    }
}

#[async_trait]
impl JobSource for HttpJobSource {
    async fn fetch(&self) -> FetchResult<Vec<RawJobRecord>> {
        let primary_err = match self.fetch_url(&self.primary_url).await {
            Ok(records) => return Ok(records),
            Err(err) => err,
        };

        let Some(fallback) = self.fallback_url.as_deref() else {
            return Err(primary_err);
        };
        warn!(
            error = %primary_err,
            fallback,
            "Primary schedule feed failed, trying fallback"
        );
        self.fetch_url(fallback).await
    }

    fn describe(&self) -> String {
        match &self.fallback_url {
            Some(fallback) => format!("{} (fallback {})", self.primary_url, fallback),
            None => self.primary_url.clone(),
        }
    }
}
