use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

use crate::calendar::{WeekTitle, parse_flexible_date, shipping_week};
use crate::refresh::{BoardState, Refresher};
use crate::{BoardSnapshot, Job, RefreshSummary};

#[derive(Clone)]
pub struct AppState {
    refresher: Refresher,
}

impl AppState {
    pub fn new(refresher: Refresher) -> Self {
        Self { refresher }
    }

    fn board(&self) -> BoardState {
        self.refresher.state()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                let body = Json(ErrorBody {
                    error: "not_found",
                    message,
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct DayBucketBody {
    date: NaiveDate,
    jobs: Vec<Job>,
}

#[derive(Debug, Serialize)]
struct ShippingWeekBody {
    date: NaiveDate,
    shipping_week: u32,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/board", get(get_board))
        .route("/board/days", get(get_day_buckets))
        .route("/board/days/:date", get(get_day_bucket))
        .route("/board/weeks", get(get_week_titles))
        .route("/jobs/future", get(get_future_jobs))
        .route("/trains/past", get(get_past_trains))
        .route("/trains/upcoming", get(get_upcoming_trains))
        .route("/shipping-week/:date", get(get_shipping_week))
        .route("/refresh", post(refresh_board))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Serving dispatch board API");
    axum::serve(listener, app).await
}

fn parse_path_date(raw: &str) -> Result<NaiveDate, ApiError> {
    parse_flexible_date(raw)
        .ok_or_else(|| ApiError::invalid(format!("invalid date '{raw}' (expected YYYY-MM-DD)")))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_board(State(state): State<AppState>) -> Json<BoardSnapshot> {
    let snapshot = state.board().snapshot();
    Json(snapshot.as_ref().clone())
}

async fn get_day_buckets(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.board().snapshot();
    Json(snapshot.day_buckets.clone())
}

async fn get_day_bucket(
    State(state): State<AppState>,
    Path(raw_date): Path<String>,
) -> Result<Json<DayBucketBody>, ApiError> {
    let date = parse_path_date(&raw_date)?;
    let snapshot = state.board().snapshot();
    match snapshot.bucket(date) {
        Some(jobs) => Ok(Json(DayBucketBody {
            date,
            jobs: jobs.to_vec(),
        })),
        None => Err(ApiError::not_found(format!(
            "{date} is outside the board window {}..{}",
            snapshot.window_start, snapshot.window_end
        ))),
    }
}

async fn get_week_titles(State(state): State<AppState>) -> Json<Vec<WeekTitle>> {
    Json(state.board().snapshot().week_titles.clone())
}

async fn get_future_jobs(State(state): State<AppState>) -> Json<Vec<Job>> {
    Json(state.board().snapshot().future_jobs.clone())
}

async fn get_past_trains(State(state): State<AppState>) -> Json<Vec<Job>> {
    Json(state.board().snapshot().past_trains.clone())
}

async fn get_upcoming_trains(State(state): State<AppState>) -> Json<Vec<Job>> {
    Json(state.board().snapshot().upcoming_trains.clone())
}

async fn get_shipping_week(Path(raw_date): Path<String>) -> Result<Json<ShippingWeekBody>, ApiError> {
    let date = parse_path_date(&raw_date)?;
    Ok(Json(ShippingWeekBody {
        date,
        shipping_week: shipping_week(date),
    }))
}

async fn refresh_board(State(state): State<AppState>) -> Json<RefreshSummary> {
    Json(state.refresher.refresh_once().await)
}
