use async_trait::async_trait;
use axum::{
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use gavel::client::{
    spawn_classify, spawn_health_check, Classifier, ClientError, ClientEvent, HttpClassifier,
};
use gavel::config::Config;
use gavel::state::{AppState, Phase, ServiceStatus};
use gavel::types::{Classification, HealthReport};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve test routes");
    });
    addr
}

fn client_for(addr: SocketAddr) -> HttpClassifier {
    let base = format!("http://{addr}");
    let config = Config::parse_from(["gavel", "--base-url", base.as_str(), "--timeout-secs", "5"]);
    HttpClassifier::new(&config).expect("build classifier")
}

#[tokio::test]
async fn classify_round_trip_posts_the_comment() {
    let captured: Arc<tokio::sync::Mutex<Option<Value>>> =
        Arc::new(tokio::sync::Mutex::new(None));
    let captured_for_route = captured.clone();
    let router = Router::new().route(
        "/classify",
        post(move |Json(body): Json<Value>| {
            let captured = captured_for_route.clone();
            async move {
                *captured.lock().await = Some(body);
                Json(json!({
                    "category": "toxic",
                    "confidence": 87.4,
                    "all_predictions": {
                        "toxic": {"predicted": 1, "confidence": 87.4},
                        "obscene": {"predicted": 0, "confidence": 12.1}
                    }
                }))
            }
        }),
    );
    let addr = serve(router).await;
    let classifier = client_for(addr);

    let classification = classifier
        .classify("you are awful")
        .await
        .expect("classification should succeed");

    assert_eq!(classification.category, "toxic");
    assert_eq!(classification.confidence, 87.4);
    let predictions = classification
        .all_predictions
        .expect("per-label breakdown");
    assert_eq!(predictions["toxic"].predicted, 1);
    assert_eq!(predictions["obscene"].confidence, 12.1);

    let body = captured.lock().await.take().expect("request body captured");
    assert_eq!(body, json!({"comment": "you are awful"}));
}

#[tokio::test]
async fn application_error_in_a_success_body_is_shown_verbatim() {
    let router = Router::new().route(
        "/classify",
        post(|| async { Json(json!({"error": "Models not loaded properly"})) }),
    );
    let addr = serve(router).await;
    let classifier = client_for(addr);

    let error = classifier
        .classify("anything")
        .await
        .expect_err("error body should fail classification");

    assert!(matches!(error, ClientError::Api { .. }));
    assert_eq!(error.to_string(), "Models not loaded properly");
}

#[tokio::test]
async fn http_failure_status_wins_over_the_body() {
    let router = Router::new().route(
        "/classify",
        post(|| async {
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "boom"})),
            )
        }),
    );
    let addr = serve(router).await;
    let classifier = client_for(addr);

    let error = classifier
        .classify("anything")
        .await
        .expect_err("server failure should fail classification");

    assert!(matches!(error, ClientError::Status { .. }));
    let message = error.to_string();
    assert!(message.contains("500"), "message should name the status: {message}");
    assert!(
        !message.contains("boom"),
        "body must not leak into the message: {message}"
    );
}

#[tokio::test]
async fn unreachable_service_reports_the_base_url() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);

    let classifier = client_for(addr);
    let error = classifier
        .classify("anything")
        .await
        .expect_err("nothing is listening");

    assert!(matches!(error, ClientError::Connect { .. }));
    let message = error.to_string();
    assert!(
        message.contains(&format!("http://{addr}")),
        "message should include the base url: {message}"
    );
    assert!(
        message.contains("make sure the backend is running"),
        "message should tell the user what to do: {message}"
    );
}

#[tokio::test]
async fn malformed_success_body_maps_to_the_generic_message() {
    let router = Router::new().route("/classify", post(|| async { "not json" }));
    let addr = serve(router).await;
    let classifier = client_for(addr);

    let error = classifier
        .classify("anything")
        .await
        .expect_err("plain text body should fail classification");

    assert!(matches!(error, ClientError::Unexpected { .. }));
    assert_eq!(
        error.to_string(),
        "failed to classify the comment; please try again"
    );
}

#[tokio::test]
async fn health_round_trip_reads_the_full_report() {
    let router = Router::new().route(
        "/health",
        get(|| async {
            Json(json!({
                "status": "healthy",
                "models_loaded": true,
                "available_labels": ["toxic", "obscene", "threat"]
            }))
        }),
    );
    let addr = serve(router).await;
    let classifier = client_for(addr);

    let report = classifier.health().await.expect("health should succeed");
    assert_eq!(report.status, "healthy");
    assert_eq!(report.models_loaded, Some(true));
    assert_eq!(
        report.summary(),
        "service status: healthy\nmodels loaded: true\navailable labels: toxic, obscene, threat"
    );
}

struct StubClassifier {
    classification: Classification,
}

#[async_trait]
impl Classifier for StubClassifier {
    async fn classify(&self, _comment: &str) -> Result<Classification, ClientError> {
        Ok(self.classification.clone())
    }

    async fn health(&self) -> Result<HealthReport, ClientError> {
        Ok(HealthReport {
            status: "healthy".to_string(),
            models_loaded: Some(true),
            available_labels: None,
        })
    }
}

#[tokio::test]
async fn submit_flow_lands_in_success() {
    let classifier: Arc<dyn Classifier> = Arc::new(StubClassifier {
        classification: Classification {
            category: "non_toxic".to_string(),
            confidence: 93.2,
            all_predictions: None,
        },
    });
    let (events_tx, events_rx) = flume::unbounded::<ClientEvent>();

    let mut state = AppState::new("http://127.0.0.1:5000");
    state.comment = "  what a lovely day  ".to_string();
    let comment = state.submit().expect("comment should submit");
    assert_eq!(comment, "what a lovely day");
    assert!(state.phase.is_pending());
    spawn_classify(classifier, comment, events_tx);

    let event = events_rx.recv_async().await.expect("classification event");
    state.handle_event(event);

    match &state.phase {
        Phase::Success(classification) => {
            assert_eq!(classification.category, "non_toxic");
            assert_eq!(classification.confidence, 93.2);
        }
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(state.classified, 1);
}

#[tokio::test]
async fn failed_health_check_marks_the_service_unreachable() {
    let router = Router::new().route(
        "/health",
        get(|| async { (axum::http::StatusCode::SERVICE_UNAVAILABLE, "down") }),
    );
    let addr = serve(router).await;
    let classifier: Arc<dyn Classifier> = Arc::new(client_for(addr));
    let (events_tx, events_rx) = flume::unbounded::<ClientEvent>();

    let mut state = AppState::new(format!("http://{addr}"));
    assert!(state.begin_health_check());
    spawn_health_check(classifier, events_tx);

    let event = events_rx.recv_async().await.expect("health event");
    state.handle_event(event);

    match &state.service {
        ServiceStatus::Unreachable { message, .. } => {
            assert!(
                message.contains("503"),
                "message should contain the status: {message}"
            );
        }
        other => panic!("expected unreachable, got {other:?}"),
    }
}
