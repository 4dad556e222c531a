use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use mesos_auth_client::{
    MesosConnector, TaskState,
    testing::{FakeMesos, mk_task},
};
use mesos_auth_core::{InmemStorage, MesosAuthBackend};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::HttpApi;
use crate::BackendAdapter;

fn router() -> axum::Router {
    let backend = MesosAuthBackend::new(
        Arc::new(InmemStorage::new()),
        MesosConnector::new(10).unwrap(),
    );
    HttpApi::new(Arc::new(BackendAdapter::new(Arc::new(backend)))).router()
}

async fn send(router: &axum::Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };

    let resp = router.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post(router: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, Method::POST, uri, Some(body)).await
}

async fn get(router: &axum::Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::GET, uri, None).await
}

#[tokio::test]
async fn config_read_before_and_after_write() {
    let r = router();
    assert_eq!(get(&r, "/v1/config").await, (StatusCode::NO_CONTENT, Value::Null));

    let (status, body) = post(&r, "/v1/config", json!({ "period": 42 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "errors": ["base-url not configured"] }));

    let (status, _) = post(&r, "/v1/config", json!({ "base-url": "http://master.mesos:5050" })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = post(&r, "/v1/config", json!({ "period": "7m" })).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(
        get(&r, "/v1/config").await,
        (
            StatusCode::OK,
            json!({ "base-url": "http://master.mesos:5050", "period": "7m", "period_secs": 420 })
        )
    );
}

#[tokio::test]
async fn config_rejects_bad_period() {
    let r = router();
    let (status, body) = post(
        &r,
        "/v1/config",
        json!({ "base-url": "http://m", "period": "whenever" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"][0].as_str().unwrap().contains("whenever"));
    assert_eq!(get(&r, "/v1/config").await.0, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn task_policies_validation() {
    let r = router();
    let cases = [
        (json!({}), "missing or invalid task-id-prefix"),
        (json!({ "policies": "insurance" }), "missing or invalid task-id-prefix"),
        (json!({ "task-id-prefix": "" }), "missing or invalid task-id-prefix"),
        (json!({ "task-id-prefix": "my-task" }), "missing or invalid policies"),
        (json!({ "task-id-prefix": "my-task", "policies": "" }), "missing or invalid policies"),
        (json!({ "task-id-prefix": "my-task", "policies": [] }), "missing or invalid policies"),
    ];

    for (req, msg) in cases {
        let (status, body) = post(&r, "/v1/task-policies", req.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{req}");
        assert_eq!(body, json!({ "errors": [msg] }), "{req}");
    }
}

#[tokio::test]
async fn task_policies_list_or_comma_string() {
    let r = router();

    let (status, _) = post(
        &r,
        "/v1/task-policies",
        json!({ "task-id-prefix": "billing", "policies": "insurance, payroll,," }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        get(&r, "/v1/task-policies/billing").await,
        (StatusCode::OK, json!({ "policies": ["insurance", "payroll"] }))
    );

    post(
        &r,
        "/v1/task-policies",
        json!({ "task-id-prefix": "billing", "policies": ["audit"] }),
    )
    .await;
    assert_eq!(
        get(&r, "/v1/task-policies/billing").await.1,
        json!({ "policies": ["audit"] })
    );

    assert_eq!(
        get(&r, "/v1/task-policies/unknown").await,
        (StatusCode::OK, json!({ "policies": [] }))
    );
}

#[tokio::test]
async fn login_and_renew_over_http() {
    let mesos = FakeMesos::start().await;
    mesos.add_task([mk_task("billing", "billing.abc-1", TaskState::TaskRunning)]);

    let r = router();
    post(&r, "/v1/config", json!({ "base-url": mesos.base_url(), "period": 420 })).await;
    post(
        &r,
        "/v1/task-policies",
        json!({ "task-id-prefix": "billing", "policies": ["insurance"] }),
    )
    .await;

    let (status, body) = post(&r, "/v1/login", json!({ "task-id": "billing.abc-1" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["auth"]["policies"], json!(["insurance"]));
    assert_eq!(body["auth"]["period_secs"], json!(420));
    assert_eq!(body["auth"]["renewable"], json!(true));
    assert_eq!(body["auth"]["internal_data"]["task-id"], json!("billing.abc-1"));

    let (status, again) = post(&r, "/v1/login", json!({ "task-id": "billing.abc-1" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(again, json!({ "errors": ["permission denied"] }));

    post(&r, "/v1/config", json!({ "period": "1m" })).await;
    let (status, renewed) = post(&r, "/v1/renew", body.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renewed["auth"]["period_secs"], json!(60));
    assert_eq!(renewed["auth"]["internal_data"], body["auth"]["internal_data"]);

    mesos.update_state(TaskState::TaskKilled, &["billing.abc-1"]);
    let (status, gone) = post(&r, "/v1/renew", body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(gone, json!({ "errors": ["task billing.abc-1 not found"] }));
}

#[tokio::test]
async fn login_without_task_id_is_denied() {
    let r = router();
    let (status, body) = post(&r, "/v1/login", json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "errors": ["permission denied"] }));
}

#[tokio::test]
async fn login_unconfigured_is_a_server_error() {
    let r = router();
    let (status, body) = post(&r, "/v1/login", json!({ "task-id": "a.b" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "errors": ["backend not configured"] }));
}

#[tokio::test]
async fn master_failures_are_bad_gateway() {
    let mesos = FakeMesos::start().await;
    let r = router();
    post(&r, "/v1/config", json!({ "base-url": format!("{}/nope", mesos.base_url()) })).await;

    let (status, body) = post(&r, "/v1/login", json!({ "task-id": "a.b" })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["errors"][0].as_str().unwrap().starts_with("orchestrator error"));
}
