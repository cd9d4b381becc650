use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use std::time::Duration;

use serde_json::{Value, json};
use tower::ServiceExt;

use lk30_codec::{libs::config::Config, routes};

fn app(scope: &str) -> Router {
    let state = routes::new_state(&Config {
        port: None,
        scope: Some(scope.to_string()),
    });
    routes::new_service(&state)
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = match bytes.len() {
        0 => Value::Null,
        _ => serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    };
    (status, body)
}

#[tokio::test]
async fn uplink() {
    let (status, body) = post(
        app("lk30-codec"),
        "/lk30-codec/api/v1/codec/uplink",
        json!({ "data": { "payload": "01ffff0081", "fPort": 1, "variables": {} } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "data": {
                "func": 1,
                "measurand": 65535,
                "batteryVoltage": 0,
                "alarm_status": 1,
                "alarm_direction": 1
            }
        })
    );
}

#[tokio::test]
async fn uplink_short_payload() {
    let (status, _) = post(
        app("lk30-codec"),
        "/lk30-codec/api/v1/codec/uplink",
        json!({ "data": { "payload": "01000032" } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn uplink_not_hex() {
    let (status, _) = post(
        app("lk30-codec"),
        "/lk30-codec/api/v1/codec/uplink",
        json!({ "data": { "payload": "zz" } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn downlink() {
    let (status, body) = post(
        app("lk30-codec"),
        "/lk30-codec/api/v1/codec/downlink",
        json!({ "data": { "func": 1, "wait": 300, "measurements": 10 } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": { "payload": "01012c000a" } }));

    let (status, body) = post(
        app("lk30-codec"),
        "/lk30-codec/api/v1/codec/downlink",
        json!({ "data": { "func": 128 }, "variables": { "k": "v" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": { "payload": "80" } }));
}

#[tokio::test]
async fn downlink_errors() {
    let (status, _) = post(
        app("lk30-codec"),
        "/lk30-codec/api/v1/codec/downlink",
        json!({ "data": { "func": 99 } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        app("lk30-codec"),
        "/lk30-codec/api/v1/codec/downlink",
        json!({ "data": { "func": 1, "wait": 65536, "measurements": 1 } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn custom_scope() {
    let (status, body) = post(
        app("/sensors/lk30/"),
        "/sensors/lk30/api/v1/codec/downlink",
        json!({ "data": { "func": 2, "threshold": 500, "deadband": 20, "alarm_dir": 1, "alarm_active": true } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": { "payload": "0205dc001481" } }));
}

#[tokio::test]
async fn app_layers() {
    let state = routes::new_state(&Config {
        port: None,
        scope: None,
    });
    let app = routes::new_app(&state, Duration::from_secs(10));
    let req = Request::builder()
        .method("POST")
        .uri("/lk30-codec/api/v1/codec/downlink")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "http://localhost")
        .body(Body::from(json!({ "data": { "func": "128" } }).to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
