use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::{Days, NaiveDate, Utc};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;
use wisdom_insights::analyzer::PatternAggregator;
use wisdom_insights::model::{DailyPattern, SourceError};
use wisdom_insights::server::{router, AppState, USER_HEADER};
use wisdom_insights::source::{MetricSource, StoredSource};
use wisdom_insights::storage::SqliteStorage;

/// A source whose upstream is always down.
struct UnavailableSource;

#[async_trait]
impl MetricSource for UnavailableSource {
    async fn recent_patterns(&self, _user_id: &str, _days: usize) -> Result<Vec<DailyPattern>, SourceError> {
        Err(SourceError::Status(503))
    }
}

/// Returns whatever it was built with, regardless of user.
struct FixedSource(Vec<DailyPattern>);

#[async_trait]
impl MetricSource for FixedSource {
    async fn recent_patterns(&self, _user_id: &str, _days: usize) -> Result<Vec<DailyPattern>, SourceError> {
        Ok(self.0.clone())
    }
}

/// A source with a bug that panics mid-request.
struct PanickingSource;

#[async_trait]
impl MetricSource for PanickingSource {
    async fn recent_patterns(&self, _user_id: &str, _days: usize) -> Result<Vec<DailyPattern>, SourceError> {
        panic!("unexpected upstream bug");
    }
}

fn app(source: Arc<dyn MetricSource>) -> axum::Router {
    router(Arc::new(AppState {
        aggregator: PatternAggregator::new(source, 7),
    }))
}

fn stored_app() -> (axum::Router, Arc<Mutex<SqliteStorage>>) {
    let storage = Arc::new(Mutex::new(SqliteStorage::new(":memory:").unwrap()));
    (app(Arc::new(StoredSource::new(storage.clone()))), storage)
}

async fn get_json(app: axum::Router, uri: &str, user: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().uri(uri);
    if let Some(user) = user {
        request = request.header(USER_HEADER, user);
    }
    let response = app.oneshot(request.body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn rising_week(end: NaiveDate) -> Vec<DailyPattern> {
    (0..7u64)
        .map(|i| DailyPattern {
            date: end.checked_sub_days(Days::new(6 - i)).unwrap(),
            energy: 50.0 + 5.0 * i as f64,
            focus: 60.0,
            fulfillment: 90.0 - 3.0 * i as f64,
        })
        .collect()
}

#[tokio::test]
async fn health_check() {
    let (app, _) = stored_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn user_without_checkins_gets_fallback_week() {
    let (app, _) = stored_app();
    let (status, body) = get_json(app, "/api/insights/patterns", Some("newcomer")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["patterns"].as_array().unwrap().len(), 7);
    assert_eq!(body["patterns"][0]["energy"], 72.0);
    assert_eq!(body["averages"], serde_json::json!({"energy": 78, "focus": 74, "fulfillment": 81}));
    assert_eq!(body["trends"]["energy"]["direction"], "falling");
    assert_eq!(body["trends"]["energy"]["change"], 4.0);
    assert_eq!(body["significantTrends"], serde_json::json!([]));
    assert_eq!(body["insights"].as_array().unwrap().len(), 3);
    assert!(!body["narrative"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn missing_user_header_gets_fallback_week() {
    let (app, _) = stored_app();
    let (status, body) = get_json(app, "/api/insights/patterns", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback");
}

#[tokio::test]
async fn upstream_failure_still_answers_ok() {
    let (status, body) = get_json(app(Arc::new(UnavailableSource)), "/api/insights/patterns?refresh=true", Some("alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["averages"]["fulfillment"], 81);
}

#[tokio::test]
async fn panic_during_aggregation_still_answers_ok() {
    let (status, body) = get_json(app(Arc::new(PanickingSource)), "/api/insights/patterns", Some("alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["averages"], serde_json::json!({"energy": 78, "focus": 74, "fulfillment": 81}));
}

#[tokio::test]
async fn non_finite_samples_fall_back() {
    let mut week = rising_week(Utc::now().date_naive());
    week[2].energy = f64::INFINITY;
    let (status, body) = get_json(app(Arc::new(FixedSource(week))), "/api/insights/patterns", Some("alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback");
}

#[tokio::test]
async fn stored_checkins_produce_live_report() {
    let (app, storage) = stored_app();
    let today = Utc::now().date_naive();
    {
        let storage = storage.lock().await;
        // An older day outside the 7-day window must not affect the report.
        storage
            .save_checkin(
                "alice",
                &DailyPattern {
                    date: today.checked_sub_days(Days::new(10)).unwrap(),
                    energy: 5.0,
                    focus: 5.0,
                    fulfillment: 5.0,
                },
            )
            .unwrap();
        for day in rising_week(today) {
            storage.save_checkin("alice", &day).unwrap();
        }
    }

    let (status, body) = get_json(app, "/api/insights/patterns", Some("alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "live");
    assert_eq!(body["patterns"].as_array().unwrap().len(), 7);
    assert_eq!(body["patterns"][0]["energy"], 50.0);

    assert_eq!(body["trends"]["energy"]["direction"], "rising");
    assert_eq!(body["trends"]["energy"]["consecutiveDays"], 6);
    assert_eq!(body["trends"]["energy"]["trendStrength"], "strong");
    assert_eq!(body["trends"]["energy"]["change"], 30.0);
    assert_eq!(body["trends"]["focus"]["direction"], "flat");
    assert_eq!(body["trends"]["focus"]["consecutiveDays"], 0);

    assert_eq!(
        body["significantTrends"],
        serde_json::json!([
            {"metric": "energy", "direction": "rising", "consecutiveDays": 6, "strength": "strong"},
            {"metric": "fulfillment", "direction": "falling", "consecutiveDays": 6, "strength": "strong"}
        ])
    );
    assert_eq!(body["correlations"][1]["coefficient"], -1.0);
    assert!(body["narrative"].as_str().unwrap().starts_with("Energy has been rising for 6 consecutive days"));
}
