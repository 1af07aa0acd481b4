use async_trait::async_trait;
use chrono::NaiveDate;
use dispatch_board::error::FetchResult;
use dispatch_board::{
    BoardConfig, BoardSnapshot, BoardState, FetchError, JobSource, RawJobRecord, Refresher,
    parse_raw_json,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Serves whatever feed is currently set; `None` simulates an outage.
struct StaticSource {
    feed: Mutex<Option<String>>,
}

impl StaticSource {
    fn new(feed: &str) -> Arc<Self> {
        Arc::new(Self {
            feed: Mutex::new(Some(feed.to_string())),
        })
    }

    fn set(&self, feed: Option<&str>) {
        *self.feed.lock() = feed.map(str::to_string);
    }
}

#[async_trait]
impl JobSource for StaticSource {
    async fn fetch(&self) -> FetchResult<Vec<RawJobRecord>> {
        let feed = self.feed.lock().clone();
        match feed {
            Some(text) => parse_raw_json(&text).map_err(|err| FetchError::Decode {
                origin: "memory".to_string(),
                message: err.to_string(),
            }),
            None => Err(FetchError::Decode {
                origin: "memory".to_string(),
                message: "feed offline".to_string(),
            }),
        }
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

const TWO_JOBS: &str = r#"[
    {"job": "4521", "client": "Acme", "startDate": "2025-07-28", "endDate": "2025-07-29"},
    {"job": "SPL", "startDate": "2025-08-01"}
]"#;

const ONE_JOB: &str = r#"[{"job": "Safety day", "startDate": "2025-08-05"}]"#;

fn anchored() -> BoardConfig {
    BoardConfig {
        window_start: Some(d(2025, 7, 30)),
        ..BoardConfig::default()
    }
}

#[tokio::test]
async fn refresh_replaces_board_wholesale() {
    let source = StaticSource::new(TWO_JOBS);
    let refresher = Refresher::new(source.clone(), anchored());
    let state = refresher.state();
    assert_eq!(state.snapshot().job_count, 0);

    let summary = refresher.refresh_at(d(2025, 7, 30)).await;
    assert_eq!(summary.job_count, 2);
    assert_eq!(summary.in_calendar_count, 2);
    let first = state.snapshot();
    assert_eq!(first.day_buckets.entry_count(), 3);

    source.set(Some(ONE_JOB));
    refresher.refresh_at(d(2025, 7, 30)).await;
    let second = state.snapshot();
    assert_eq!(second.job_count, 1);
    assert_eq!(second.day_buckets.entry_count(), 1);

    // Earlier readers keep the board they were handed
    assert_eq!(first.job_count, 2);
}

#[tokio::test]
async fn failed_fetch_shows_empty_board() {
    let source = StaticSource::new(TWO_JOBS);
    let refresher = Refresher::new(source.clone(), anchored());
    refresher.refresh_at(d(2025, 7, 30)).await;
    assert_eq!(refresher.state().snapshot().job_count, 2);

    source.set(None);
    let summary = refresher.refresh_at(d(2025, 7, 30)).await;
    assert_eq!(summary.job_count, 0);
    let board = refresher.state().snapshot();
    assert_eq!(board.day_buckets.len(), 14);
    assert_eq!(board.day_buckets.entry_count(), 0);
}

#[tokio::test]
async fn refresher_writes_into_shared_state() {
    let shared = BoardState::new(BoardSnapshot::empty(&anchored(), d(2025, 7, 30)));
    let source = StaticSource::new(TWO_JOBS);
    let refresher = Refresher::with_state(source, anchored(), shared.clone());
    assert_eq!(refresher.config().window_start, Some(d(2025, 7, 30)));

    refresher.refresh_at(d(2025, 7, 30)).await;
    // A handle made before the refresher sees its boards
    assert_eq!(shared.snapshot().job_count, 2);
    assert_eq!(shared.snapshot().window_start, d(2025, 7, 27));
}

#[tokio::test]
async fn spawned_refresher_runs_first_cycle_immediately() {
    let source = StaticSource::new(TWO_JOBS);
    let config = BoardConfig {
        refresh_interval_secs: 1,
        ..anchored()
    };
    let refresher = Refresher::new(source.clone(), config);
    let state = refresher.state();
    let handle = refresher.spawn();

    let waited = tokio::time::timeout(Duration::from_secs(5), async {
        while state.snapshot().job_count != 2 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    assert!(waited.is_ok(), "first refresh never landed");

    source.set(Some(ONE_JOB));
    let waited = tokio::time::timeout(Duration::from_secs(5), async {
        while state.snapshot().job_count != 1 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await;
    assert!(waited.is_ok(), "timed refresh never replaced the board");

    handle.abort();
}
