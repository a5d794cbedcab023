use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::json;

use super::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
    pub store_status: String,
}

pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "SLH Platform Running",
        "environment": state.config.environment,
        "community": state.config.community_url,
    }))
}

/// Reports the webhook URL Telegram currently has on record.
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    match state.telegram.webhook_url().await {
        Ok(webhook_url) => (
            StatusCode::OK,
            Json(json!({
                "status": "active",
                "environment": state.config.environment,
                "webhook_url": webhook_url,
                "community": state.config.community_url,
            })),
        ),
        Err(e) => {
            tracing::error!("Status error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "error": e.to_string() })),
            )
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_status = if state.store.is_healthy().await {
        "connected"
    } else {
        "disconnected"
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.store.backend().to_string(),
        store_status: store_status.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::super::{build_router, test_support::app_state};
    use crate::bot::testing::RecordingBotApi;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn index_reports_running() {
        let app = build_router(app_state(Arc::new(RecordingBotApi::default())).await);
        let (status, body) = get_json(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "SLH Platform Running");
        assert_eq!(body["environment"], "test");
        assert_eq!(body["community"], crate::constants::COMMUNITY_URL);
    }

    #[tokio::test]
    async fn status_reads_registered_webhook() {
        let api = Arc::new(RecordingBotApi::default());
        *api.registered.lock().unwrap() = Some("https://bot.example.com/webhook".to_string());
        let app = build_router(app_state(api).await);

        let (status, body) = get_json(app, "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "active");
        assert_eq!(body["webhook_url"], "https://bot.example.com/webhook");
    }

    #[tokio::test]
    async fn status_surfaces_api_failure() {
        let mut state = app_state(Arc::new(RecordingBotApi::default())).await;
        state.telegram = Arc::new(
            crate::integrations::telegram::TelegramClient::new("http://127.0.0.1:1", "123:t")
                .unwrap(),
        );
        let (status, body) = get_json(build_router(state), "/status").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn health_reports_store_backend() {
        let app = build_router(app_state(Arc::new(RecordingBotApi::default())).await);
        let (status, body) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["store"], "sqlite");
        assert_eq!(body["store_status"], "connected");
    }
}
