//! API Tests
//!
//! Drive the router in-process with `tower::ServiceExt::oneshot`.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use super::*;
use crate::config::QuantumConfig;

fn create_test_app() -> Router {
    create_router(AppState::demo())
}

async fn send(app: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("test");

    let response = app.oneshot(request).await.expect("test");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("test");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

// =============================================================================
// Health / metrics
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = send(create_test_app(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "QuantumSynth");
    assert_eq!(body["version"], crate::VERSION);
    assert!(body["timestamp"].is_string());
    assert!(body["serverTime"].is_string());
    assert!(body.get("server_time").is_none());
}

#[tokio::test]
async fn test_metrics_endpoint_shape() {
    let (status, body) = send(create_test_app(), "GET", "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    let metrics = &body["metrics"];
    assert!(metrics["uptime_seconds"].is_u64());
    assert_eq!(metrics["requests_total"], 0);
    assert_eq!(metrics["active_sessions"], 0);
    assert_eq!(metrics["quantum_jobs_run"], 0);
}

#[tokio::test]
async fn test_metrics_count_dispatches() {
    let state = AppState::demo();
    let app = create_router(state.clone());

    let ok = r#"{"input":"abc","mode":"superposition"}"#;
    let bad = r#"{"input":"","mode":"superposition"}"#;
    send(app.clone(), "POST", "/api/v1/quantum/process", Some(ok)).await;
    send(app.clone(), "POST", "/api/v1/quantum/process", Some(bad)).await;
    send(
        app.clone(),
        "POST",
        "/api/v1/inference",
        Some(r#"{"model":"m","data":"d"}"#),
    )
    .await;

    let (_, body) = send(app, "GET", "/metrics", None).await;
    assert_eq!(body["metrics"]["requests_total"], 3);
    assert_eq!(body["metrics"]["quantum_jobs_run"], 2);
    assert_eq!(body["metrics"]["active_sessions"], 0);
    assert_eq!(state.metrics().snapshot().requests_failed, 1);
}

#[tokio::test]
async fn test_prometheus_endpoint() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics/prometheus")
                .body(Body::empty())
                .expect("test"),
        )
        .await
        .expect("test");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("test");
    let text = String::from_utf8(bytes.to_vec()).expect("utf8");
    assert!(text.contains("quantumsynth_requests_total 0"));
}

// =============================================================================
// Process
// =============================================================================

#[tokio::test]
async fn test_process_success() {
    let (status, body) = send(
        create_test_app(),
        "POST",
        "/api/v1/quantum/process",
        Some(r#"{"input":"qbit","mode":"entanglement"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let output = body["result"]["output"].as_str().expect("output");
    assert!(output.starts_with("Entangled(qbit):"));
    assert!(body["result"]["timestamp"].is_string());
}

#[tokio::test]
async fn test_process_unknown_mode_is_classic() {
    let (status, body) = send(
        create_test_app(),
        "POST",
        "/api/v1/quantum/process",
        Some(r#"{"input":"legacy","mode":"classic"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["result"]["output"]
        .as_str()
        .expect("output")
        .starts_with("Classic(legacy):"));
}

#[tokio::test]
async fn test_process_absent_mode_is_classic() {
    let mut config = AppConfig::default();
    config.quantum = QuantumConfig {
        default_mode: "deep-neuro-synth".to_string(),
        max_jobs: 8,
    };
    let state = AppState::new(config);

    for body in [
        r#"{"input":"x"}"#,
        r#"{"input":"x","mode":""}"#,
        r#"{"input":"x","mode":null}"#,
    ] {
        let app = create_router(state.clone());
        let (status, resp) = send(app, "POST", "/api/v1/quantum/process", Some(body)).await;
        assert_eq!(status, StatusCode::OK, "body {body}");
        assert!(
            resp["result"]["output"]
                .as_str()
                .expect("output")
                .starts_with("Classic(x):"),
            "body {body}"
        );
    }
}

#[tokio::test]
async fn test_process_empty_input_is_400() {
    let (status, body) = send(
        create_test_app(),
        "POST",
        "/api/v1/quantum/process",
        Some(r#"{"input":"","mode":"superposition"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid input");
    assert!(body["detail"].as_str().expect("detail").contains("empty input"));
}

#[tokio::test]
async fn test_process_malformed_json_is_400() {
    let (status, body) = send(
        create_test_app(),
        "POST",
        "/api/v1/quantum/process",
        Some(r#"{"input": "#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid input");
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_process_missing_field_is_400() {
    let (status, _) = send(
        create_test_app(),
        "POST",
        "/api/v1/quantum/process",
        Some(r#"{"mode":"superposition"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_process_without_content_type_is_400() {
    let response = create_test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/quantum/process")
                .body(Body::from(r#"{"input":"x"}"#))
                .expect("test"),
        )
        .await
        .expect("test");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_process_capacity_exceeded_is_503() {
    let mut config = AppConfig::default();
    config.quantum.max_jobs = 1;
    let state = AppState::new(config);
    let _held = state.metrics().begin_session(usize::MAX).expect("slot");

    let (status, body) = send(
        create_router(state.clone()),
        "POST",
        "/api/v1/quantum/process",
        Some(r#"{"input":"x","mode":"superposition"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Service busy");
}

// =============================================================================
// Models / inference
// =============================================================================

#[tokio::test]
async fn test_models_endpoint() {
    let (status, body) = send(create_test_app(), "GET", "/api/v1/models", None).await;
    assert_eq!(status, StatusCode::OK);
    let mut models: Vec<&str> = body["models"]
        .as_array()
        .expect("models")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    models.sort_unstable();
    assert_eq!(
        models,
        vec!["deep-neuro-synth", "entanglement", "quantum-walk", "superposition"]
    );
}

#[tokio::test]
async fn test_inference_success() {
    let (status, body) = send(
        create_test_app(),
        "POST",
        "/api/v1/inference",
        Some(r#"{"model":"superposition","data":"test"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let output = body["output"].as_str().expect("output");
    assert!(output.contains("superposition"));
    assert!(output.contains("test"));
}

#[tokio::test]
async fn test_inference_empty_fields_is_400() {
    for json in [
        r#"{"model":"","data":"x"}"#,
        r#"{"model":"m","data":""}"#,
        r#"{"model":"","data":""}"#,
    ] {
        let (status, body) =
            send(create_test_app(), "POST", "/api/v1/inference", Some(json)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {json}");
        assert_eq!(body["error"], "Invalid input");
    }
}

#[tokio::test]
async fn test_inference_missing_fields_is_400() {
    let (status, _) = send(create_test_app(), "POST", "/api/v1/inference", Some("{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Matrix / collapse
// =============================================================================

#[tokio::test]
async fn test_matrix_endpoint() {
    let (status, body) = send(
        create_test_app(),
        "POST",
        "/api/v1/quantum/matrix",
        Some(r#"{"size":4}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["matrix"].as_array().expect("rows");
    assert_eq!(rows.len(), 4);
    assert!(rows
        .iter()
        .all(|r| r.as_array().map(Vec::len) == Some(4)));
}

#[tokio::test]
async fn test_matrix_out_of_range_is_400() {
    for json in [r#"{"size":0}"#, r#"{"size":-3}"#, r#"{"size":1}"#, r#"{"size":129}"#] {
        let (status, _) = send(
            create_test_app(),
            "POST",
            "/api/v1/quantum/matrix",
            Some(json),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {json}");
    }
}

#[tokio::test]
async fn test_collapse_endpoint() {
    let (status, body) = send(
        create_test_app(),
        "POST",
        "/api/v1/quantum/collapse",
        Some(r#"{"data":[0.1,-2.5,0.5,3.0],"threshold":1.0}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["collapsed"], serde_json::json!([0, 1, 0, 1]));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, _) = send(create_test_app(), "GET", "/api/v1/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Helpers
// =============================================================================

#[test]
fn test_dispatch_err_mapping() {
    let (status, body) = dispatch_err(&QuantumSynthError::invalid_argument("x"), "Failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.error, "Invalid input");

    let (status, _) = dispatch_err(&QuantumSynthError::CapacityExceeded { limit: 2 }, "Failed");
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = dispatch_err(&QuantumSynthError::internal("boom"), "Inference failed");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.error, "Inference failed");
    assert!(body.detail.contains("boom"));
}

#[test]
fn test_error_response_omits_empty_detail() {
    let body = ErrorResponse {
        error: "Invalid input".to_string(),
        detail: String::new(),
    };
    let json = serde_json::to_string(&body).expect("serialize");
    assert_eq!(json, r#"{"error":"Invalid input"}"#);
}

#[test]
fn test_app_state_uses_config() {
    let mut config = AppConfig::default();
    config.server.port = 9999;
    let state = AppState::new(config);
    assert_eq!(state.config().server.port, 9999);
}
