use super::*;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use pager_core::testing::{ManualTimerService, RecordingTarget};
use pager_core::{EscalationPolicy, MonitoredService, PagerService};
use pager_protocols::Target;
use tower::ServiceExt;

struct Fixture {
    router: Router,
    pager: Arc<PagerService>,
    timer: Arc<ManualTimerService>,
    first: Arc<RecordingTarget>,
    second: Arc<RecordingTarget>,
}

fn fixture() -> Fixture {
    let timer = Arc::new(ManualTimerService::new());
    let first = Arc::new(RecordingTarget::new("oncall-email"));
    let second = Arc::new(RecordingTarget::new("lead-sms"));
    let policy = EscalationPolicy::new(vec![
        vec![first.clone() as Arc<dyn Target>],
        vec![second.clone() as Arc<dyn Target>],
    ]);

    let pager = Arc::new(PagerService::new());
    pager.add_monitored_service(MonitoredService::new("billing", policy, timer.clone()));

    let router = create_router(Arc::new(AppState::new(pager.clone())));
    Fixture {
        router,
        pager,
        timer,
        first,
        second,
    }
}

fn post(uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder().method("POST").uri(uri);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_alert_notifies_first_level() {
    let f = fixture();
    let response = f
        .router
        .oneshot(post(
            "/services/billing/alerts",
            Some(serde_json::json!({"message": "checkout latency"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = json_body(response).await;
    assert_eq!(body["service_id"], "billing");
    assert_eq!(body["event"], "alert");

    assert_eq!(f.first.notification_count(), 1);
    assert_eq!(f.first.notifications()[0].message(), "checkout latency");
    assert_eq!(f.second.notification_count(), 0);
    assert_eq!(f.timer.start_count(), 1);
}

#[tokio::test]
async fn test_alert_unknown_service() {
    let f = fixture();
    let response = f
        .router
        .oneshot(post(
            "/services/search/alerts",
            Some(serde_json::json!({"message": "down"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("search"));
}

#[tokio::test]
async fn test_alert_without_body_is_rejected() {
    let f = fixture();
    let response = f
        .router
        .oneshot(post("/services/billing/alerts", None))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert_eq!(f.first.attempt_count(), 0);
}

#[tokio::test]
async fn test_acknowledge_stops_escalation() {
    let f = fixture();
    f.router
        .clone()
        .oneshot(post(
            "/services/billing/alerts",
            Some(serde_json::json!({"message": "down"})),
        ))
        .await
        .unwrap();

    let response = f
        .router
        .oneshot(post("/services/billing/acknowledge", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    assert!(f.timer.fire_last().await);
    assert_eq!(f.second.notification_count(), 0);

    let snapshot = f.pager.snapshot("billing").await.unwrap();
    assert!(snapshot.alert.unwrap().acknowledged);
}

#[tokio::test]
async fn test_acknowledge_unknown_service() {
    let f = fixture();
    let response = f
        .router
        .oneshot(post("/services/search/acknowledge", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_healthy_closes_incident() {
    let f = fixture();
    f.router
        .clone()
        .oneshot(post(
            "/services/billing/alerts",
            Some(serde_json::json!({"message": "down"})),
        ))
        .await
        .unwrap();

    let response = f
        .router
        .clone()
        .oneshot(post("/services/billing/healthy", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = f.router.oneshot(get("/services/billing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["id"], "billing");
    assert_eq!(body["state"], "healthy");
}

#[tokio::test]
async fn test_healthy_unknown_service() {
    let f = fixture();
    let response = f
        .router
        .oneshot(post("/services/search/healthy", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_service_reports_escalation() {
    let f = fixture();
    f.router
        .clone()
        .oneshot(post(
            "/services/billing/alerts",
            Some(serde_json::json!({"message": "down"})),
        ))
        .await
        .unwrap();
    assert!(f.timer.fire_last().await);

    let response = f.router.oneshot(get("/services/billing")).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["state"], "unhealthy");
    assert_eq!(body["alert"]["message"], "down");
    assert_eq!(body["alert"]["escalation_level"], 1);
    assert_eq!(body["alert"]["acknowledged"], false);
}

#[tokio::test]
async fn test_get_unknown_service() {
    let f = fixture();
    let response = f.router.oneshot(get("/services/search")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_services() {
    let f = fixture();
    let response = f.router.oneshot(get("/services")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["services"][0]["id"], "billing");
    assert_eq!(body["services"][0]["state"], "healthy");
}

#[tokio::test]
async fn test_health() {
    let f = fixture();
    let response = f.router.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["services"], 1);
}
