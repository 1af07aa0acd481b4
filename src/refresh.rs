use crate::board::{Board, BoardSnapshot, RefreshSummary};
use crate::config::BoardConfig;
use crate::parser::parse_raw_jobs;
use crate::source::{JobSource, fetch_or_empty};
use chrono::{Local, NaiveDate};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Latest board, replaced wholesale by each refresh.
///
/// Readers get an immutable `Arc` snapshot and never hold the lock while
/// using it.
#[derive(Clone)]
pub struct BoardState {
    current: Arc<RwLock<Arc<BoardSnapshot>>>,
}

impl BoardState {
    pub fn new(snapshot: BoardSnapshot) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    pub fn snapshot(&self) -> Arc<BoardSnapshot> {
        self.current.read().clone()
    }

    pub fn replace(&self, snapshot: BoardSnapshot) {
        *self.current.write() = Arc::new(snapshot);
    }
}

/// Runs fetch, parse and build cycles against one source.
///
/// Cycles are not cancelled. When a manual refresh overlaps a timed one,
/// whichever finishes last is the board that stays visible.
#[derive(Clone)]
pub struct Refresher {
    source: Arc<dyn JobSource>,
    config: BoardConfig,
    state: BoardState,
}

impl Refresher {
    /// Starts with an empty board for today's window.
    pub fn new(source: Arc<dyn JobSource>, config: BoardConfig) -> Self {
        let state = BoardState::new(BoardSnapshot::empty(&config, today()));
        Self {
            source,
            config,
            state,
        }
    }

    pub fn with_state(source: Arc<dyn JobSource>, config: BoardConfig, state: BoardState) -> Self {
        Self {
            source,
            config,
            state,
        }
    }

    pub fn state(&self) -> BoardState {
        self.state.clone()
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub async fn refresh_once(&self) -> RefreshSummary {
        self.refresh_at(today()).await
    }

    /// One cycle using `today` for parse defaults and the window anchor.
    pub async fn refresh_at(&self, today: NaiveDate) -> RefreshSummary {
        let records = fetch_or_empty(self.source.as_ref()).await;
        let jobs = parse_raw_jobs(&records, today);
        let snapshot = Board::build(&jobs, &self.config, today);
        let summary = snapshot.summary();
        self.state.replace(snapshot);
        info!(summary = %summary.to_cli_summary(), "Board refreshed");
        summary
    }

    /// Refresh now and then every `refresh_interval_secs` until the task is aborted.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                source = %self.source.describe(),
                interval_secs = self.config.refresh_interval_secs,
                "Board refresher started"
            );
            let mut tick = tokio::time::interval(self.config.refresh_interval());
            loop {
                tick.tick().await;
                self.refresh_once().await;
            }
        })
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
