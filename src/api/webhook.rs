use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::Serialize;
use teloxide::types::Update;

use super::AppState;
use crate::error::{AppError, Result};

/// Telegram only looks at the status code, so the body stays a bare word.
/// Only an unparsable body is an error; delivery problems are logged by the
/// dispatcher so Telegram does not retry the update.
pub async fn receive_update(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::error!("Webhook error: unparsable update: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error");
        }
    };

    state.dispatcher.process_update(update).await;
    (StatusCode::OK, "OK")
}

#[derive(Debug, Serialize)]
pub struct SetWebhookResponse {
    pub status: &'static str,
    pub url: String,
}

pub async fn set_webhook(State(state): State<AppState>) -> Result<Json<SetWebhookResponse>> {
    let url = state
        .config
        .webhook_url
        .clone()
        .ok_or_else(|| {
            AppError::BadRequest("TELEGRAM_WEBHOOK_URL is not configured".to_string())
        })?;

    let success = match state.telegram.set_webhook(&url).await {
        Ok(accepted) => accepted,
        Err(e) => {
            tracing::error!("setWebhook failed: {}", e);
            false
        }
    };
    tracing::info!("Webhook set: {} - {}", success, url);

    Ok(Json(SetWebhookResponse {
        status: if success { "success" } else { "failed" },
        url,
    }))
}

#[cfg(test)]
mod tests {
    use super::super::{build_router, test_support::app_state};
    use crate::bot::{messages, testing::RecordingBotApi};
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use std::sync::Arc;
    use teloxide::types::ChatId;
    use tower::ServiceExt;

    async fn post_webhook(app: axum::Router, body: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/webhook")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    const START_UPDATE: &str = r#"{"update_id": 10, "message": {"message_id": 1,
        "date": 1700000000,
        "chat": {"id": 500, "type": "private", "first_name": "Dana"},
        "from": {"id": 42, "is_bot": false, "first_name": "Dana"},
        "text": "/start"}}"#;

    #[tokio::test]
    async fn valid_update_is_dispatched() {
        let api = Arc::new(RecordingBotApi::default());
        let app = build_router(app_state(api.clone()).await);

        let (status, body) = post_webhook(app, START_UPDATE).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
        let sent = api.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("ברוך הבא Dana!"));
    }

    #[tokio::test]
    async fn garbage_body_is_an_error() {
        let api = Arc::new(RecordingBotApi::default());
        let app = build_router(app_state(api.clone()).await);

        let (status, body) = post_webhook(app, "not json").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Error");
        assert!(api.sent().is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_is_still_acknowledged() {
        let api = Arc::new(RecordingBotApi::failing());
        let state = app_state(api.clone()).await;
        let store = state.store.clone();

        let (status, body) = post_webhook(build_router(state), START_UPDATE).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
        assert!(api.sent().is_empty());
        assert!(store.get_user(42).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn fallback_reply_goes_to_sender_chat() {
        let api = Arc::new(RecordingBotApi::default());
        let app = build_router(app_state(api.clone()).await);
        let update = START_UPDATE.replace("/start", "hi there");

        let (status, _) = post_webhook(app, &update).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(api.sent()[0].chat_id, ChatId(500));
        assert_eq!(api.sent()[0].text, messages::FALLBACK);
    }

    #[tokio::test]
    async fn set_webhook_registers_configured_url() {
        let api = Arc::new(RecordingBotApi::default());
        let app = build_router(app_state(api.clone()).await);

        let response = app
            .oneshot(Request::builder().uri("/set_webhook").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "success");
        assert_eq!(body["url"], "https://bot.example.com/webhook");
        assert_eq!(
            api.registered.lock().unwrap().as_deref(),
            Some("https://bot.example.com/webhook")
        );
    }

    #[tokio::test]
    async fn set_webhook_without_url_is_bad_request() {
        let mut state = app_state(Arc::new(RecordingBotApi::default())).await;
        state.config.webhook_url = None;

        let response = build_router(state)
            .oneshot(Request::builder().uri("/set_webhook").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }
}
