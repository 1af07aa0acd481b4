use dispatch_board::{FetchError, FileJobSource, JobSource, fetch_or_empty};
use std::io::Write;
use tempfile::NamedTempFile;

#[tokio::test]
async fn file_source_reads_json_array() {
    let mut file = NamedTempFile::new().expect("create temp file");
    write!(file, r#"[{{"job": "4521"}}, {{"job": "SPL", "CarNo": 3}}]"#).unwrap();

    let source = FileJobSource::new(file.path());
    assert_eq!(source.path(), file.path());
    let records = source.fetch().await.unwrap();
    assert_eq!(records.len(), 2);
    assert!(source.describe().starts_with("file "));
}

#[tokio::test]
async fn file_source_reports_missing_file() {
    let source = FileJobSource::new("/no/such/schedule.json");
    let err = source.fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Io { .. }));
}

#[tokio::test]
async fn file_source_reports_bad_json() {
    let mut file = NamedTempFile::new().expect("create temp file");
    write!(file, r#"{{"job": "not a list"}}"#).unwrap();
    let err = FileJobSource::new(file.path()).read().unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn failed_fetch_becomes_empty_cycle() {
    let source = FileJobSource::new("/no/such/schedule.json");
    assert!(fetch_or_empty(&source).await.is_empty());
}

#[cfg(feature = "http_api")]
mod http_fallback {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
    use dispatch_board::{FetchError, HttpJobSource, JobSource};
    use serde_json::{Value, json};

    #[derive(Clone, Default)]
    struct Hits {
        primary: Arc<AtomicUsize>,
        fallback: Arc<AtomicUsize>,
    }

    async fn good_primary(State(hits): State<Hits>) -> Json<Value> {
        hits.primary.fetch_add(1, Ordering::SeqCst);
        Json(json!([{ "job": "4521" }, { "job": "SPL" }, { "job": "Audit" }]))
    }

    async fn broken_primary(State(hits): State<Hits>) -> StatusCode {
        hits.primary.fetch_add(1, Ordering::SeqCst);
        StatusCode::INTERNAL_SERVER_ERROR
    }

    async fn good_fallback(State(hits): State<Hits>) -> Json<Value> {
        hits.fallback.fetch_add(1, Ordering::SeqCst);
        Json(json!([{ "job": "7000", "startDate": "2025-07-28" }]))
    }

    async fn missing_fallback(State(hits): State<Hits>) -> StatusCode {
        hits.fallback.fetch_add(1, Ordering::SeqCst);
        StatusCode::NOT_FOUND
    }

    async fn not_a_list() -> Json<Value> {
        Json(json!({ "error": "maintenance" }))
    }

    async fn spawn_feed(hits: Hits) -> SocketAddr {
        let app = Router::new()
            .route("/schedule.json", get(good_primary))
            .route("/broken.json", get(broken_primary))
            .route("/fallback.json", get(good_fallback))
            .route("/missing.json", get(missing_fallback))
            .route("/garbled.json", get(not_a_list))
            .with_state(hits);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn url(addr: SocketAddr, path: &str) -> String {
        format!("http://{addr}{path}")
    }

    #[test]
    fn source_from_config_drops_empty_fallback() {
        let config = dispatch_board::BoardConfig {
            primary_url: "http://feed.local/schedule.json".to_string(),
            fallback_url: String::new(),
            ..Default::default()
        };
        let source = HttpJobSource::from_config(&config).unwrap();
        assert_eq!(source.primary_url(), "http://feed.local/schedule.json");
        assert_eq!(source.fallback_url(), None);
        assert_eq!(source.describe(), "http://feed.local/schedule.json");
    }

    #[tokio::test]
    async fn healthy_primary_skips_fallback() {
        let hits = Hits::default();
        let addr = spawn_feed(hits.clone()).await;
        let source = HttpJobSource::new(
            url(addr, "/schedule.json"),
            Some(url(addr, "/fallback.json")),
        )
        .unwrap();

        assert_eq!(source.primary_url(), url(addr, "/schedule.json"));
        let records = source.fetch().await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(hits.primary.load(Ordering::SeqCst), 1);
        assert_eq!(hits.fallback.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn error_status_falls_back_once() {
        let hits = Hits::default();
        let addr = spawn_feed(hits.clone()).await;
        let source =
            HttpJobSource::new(url(addr, "/broken.json"), Some(url(addr, "/fallback.json"))).unwrap();

        let records = source.fetch().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(hits.primary.load(Ordering::SeqCst), 1);
        assert_eq!(hits.fallback.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn undecodable_primary_falls_back() {
        let hits = Hits::default();
        let addr = spawn_feed(hits.clone()).await;
        let source =
            HttpJobSource::new(url(addr, "/garbled.json"), Some(url(addr, "/fallback.json"))).unwrap();

        let records = source.fetch().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(hits.fallback.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn both_failing_returns_fallback_error() {
        let hits = Hits::default();
        let addr = spawn_feed(hits.clone()).await;
        let source =
            HttpJobSource::new(url(addr, "/broken.json"), Some(url(addr, "/missing.json"))).unwrap();

        let err = source.fetch().await.unwrap_err();
        match err {
            FetchError::Status { url, status } => {
                assert!(url.ends_with("/missing.json"));
                assert_eq!(status.as_u16(), 404);
            }
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(hits.primary.load(Ordering::SeqCst), 1);
        assert_eq!(hits.fallback.load(Ordering::SeqCst), 1);
        assert!(dispatch_board::fetch_or_empty(&source).await.is_empty());
    }

    #[tokio::test]
    async fn without_fallback_primary_error_is_returned() {
        let hits = Hits::default();
        let addr = spawn_feed(hits.clone()).await;
        let source =
            HttpJobSource::new(url(addr, "/broken.json"), Some("  ".to_string())).unwrap();

        assert!(source.primary_url().ends_with("/broken.json"));
        assert_eq!(source.fallback_url(), None);
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Status { .. }));
        assert_eq!(hits.fallback.load(Ordering::SeqCst), 0);
    }
}
