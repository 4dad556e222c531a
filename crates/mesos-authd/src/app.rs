use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use mesos_auth_api::{BackendAdapter, HttpApi};
use mesos_auth_core::MesosAuthBackend;
use mesos_auth_prometheus::{PrometheusMetrics, TEXT_FORMAT};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Auth routes plus `GET /metrics`.
pub fn router(
    backend: Arc<MesosAuthBackend>,
    metrics: Arc<PrometheusMetrics>,
    shutdown: CancellationToken,
) -> Router {
    let adapter = BackendAdapter::new(backend).with_shutdown(shutdown);
    HttpApi::new(Arc::new(adapter)).router().merge(
        Router::new()
            .route("/metrics", get(serve_metrics))
            .with_state(metrics),
    )
}

async fn serve_metrics(State(metrics): State<Arc<PrometheusMetrics>>) -> Response {
    match metrics.encode() {
        Ok(text) => ([(header::CONTENT_TYPE, TEXT_FORMAT)], text).into_response(),
        Err(e) => {
            warn!(error = %e, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, body::to_bytes, http::Request};
    use mesos_auth_client::MesosConnector;
    use mesos_auth_core::InmemStorage;
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        let metrics = Arc::new(PrometheusMetrics::new().unwrap());
        let backend = MesosAuthBackend::new(
            Arc::new(InmemStorage::new()),
            MesosConnector::new(10).unwrap(),
        )
        .with_metrics(metrics.clone());
        router(Arc::new(backend), metrics, CancellationToken::new())
    }

    #[tokio::test]
    async fn denied_login_shows_up_in_metrics() {
        let app = app();

        let login = Request::post("/v1/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"task-id": ""}"#))
            .unwrap();
        let resp = app.clone().oneshot(login).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = app
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], TEXT_FORMAT);

        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains(r#"mesos_auth_logins_total{outcome="denied"} 1"#));
    }

    #[tokio::test]
    async fn auth_routes_are_mounted() {
        let resp = app()
            .oneshot(Request::get("/v1/config").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }
}
