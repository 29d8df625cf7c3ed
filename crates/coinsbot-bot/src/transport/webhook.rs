//! Webhook transport: an axum router receiving Telegram updates.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use coinsbot_core::AppConfig;
use reqwest::Url;
use serde::Serialize;
use subtle::ConstantTimeEq;
use teloxide::prelude::*;
use teloxide::types::Update;
use tower_http::trace::TraceLayer;

use crate::dispatch::MessageDispatcher;
use crate::transport::incoming_from_update;

/// Header Telegram echoes the configured secret token in.
const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Pause between dropping the old webhook and registering the new one.
const REREGISTER_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone)]
pub struct WebhookState {
    pub dispatcher: Arc<MessageDispatcher>,
    pub secret: Option<Arc<str>>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

pub fn build_router(state: WebhookState) -> Router {
    Router::new()
        .route("/webhook", post(receive_update))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}

async fn receive_update(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    if let Some(secret) = &state.secret {
        let provided = headers
            .get(SECRET_HEADER)
            .map(|v| v.as_bytes())
            .unwrap_or_default();
        if !bool::from(provided.ct_eq(secret.as_bytes())) {
            tracing::warn!("webhook request with missing or invalid secret token");
            return (StatusCode::UNAUTHORIZED, "unauthorized");
        }
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::error!(error = %e, "webhook body is not a valid update");
            return (StatusCode::INTERNAL_SERVER_ERROR, "ERR");
        }
    };

    if let Some(incoming) = incoming_from_update(&update) {
        let chat_id = incoming.chat_id.0;
        // Non-2xx makes Telegram redeliver; reply failures stay a 200.
        if let Err(e) = state.dispatcher.handle(incoming).await {
            tracing::error!(chat_id, error = %e, "webhook update processing failed");
        }
    }

    (StatusCode::OK, "OK")
}

/// Registers the webhook with Telegram and serves updates until shutdown.
///
/// # Errors
///
/// Fails if the webhook URL is missing or invalid, the listener cannot bind,
/// or Telegram rejects the registration.
pub async fn run(
    bot: Bot,
    config: &AppConfig,
    dispatcher: Arc<MessageDispatcher>,
) -> anyhow::Result<()> {
    let raw_url = config
        .webhook_url
        .as_deref()
        .context("webhook mode requires WEBHOOK_URL")?;
    let url = Url::parse(raw_url).with_context(|| format!("invalid WEBHOOK_URL '{raw_url}'"))?;

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, webhook_url = %url, "starting in webhook mode");

    if let Err(e) = bot.delete_webhook().await {
        tracing::warn!(error = %e, "failed to remove previous webhook");
    }
    tokio::time::sleep(REREGISTER_DELAY).await;

    let mut register = bot.set_webhook(url);
    if let Some(secret) = &config.webhook_secret {
        register = register.secret_token(secret.clone());
    }
    register.await.context("failed to register webhook")?;

    let state = WebhookState {
        dispatcher,
        secret: config.webhook_secret.as_deref().map(Arc::from),
    };
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(crate::shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::tests::{ChatCall, RecordingChat};
    use crate::messages::REJECT_NOT_PLATFORM_LINK;
    use crate::pipeline::test_support::{pipeline, FakeAffiliate, FakeResolver};
    use crate::pool::WorkerPool;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app(chat: Arc<RecordingChat>, secret: Option<&str>) -> Router {
        let api = Arc::new(FakeAffiliate::with_product(serde_json::json!({})));
        let dispatcher = MessageDispatcher::new(
            chat,
            Arc::new(pipeline(FakeResolver(None), api)),
            WorkerPool::new(1),
        );
        build_router(WebhookState {
            dispatcher: Arc::new(dispatcher),
            secret: secret.map(Arc::from),
        })
    }

    fn text_update(text: &str) -> String {
        serde_json::json!({
            "update_id": 10_000,
            "message": {
                "message_id": 1365,
                "date": 1_700_000_000,
                "chat": { "id": 1_111_111, "type": "private", "first_name": "Test" },
                "from": { "id": 1_111_111, "is_bot": false, "first_name": "Test" },
                "text": text
            }
        })
        .to_string()
    }

    fn post_update(body: String, secret: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json");
        if let Some(secret) = secret {
            builder = builder.header(SECRET_HEADER, secret);
        }
        builder.body(Body::from(body)).expect("request")
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        String::from_utf8(bytes.to_vec()).expect("utf8")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app(Arc::new(RecordingChat::default()), None)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn valid_update_is_dispatched() {
        let chat = Arc::new(RecordingChat::default());
        let response = app(Arc::clone(&chat), None)
            .oneshot(post_update(text_update("hello"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
        assert!(matches!(
            chat.calls.lock().unwrap().as_slice(),
            [ChatCall::Text { text, .. }] if text == REJECT_NOT_PLATFORM_LINK
        ));
    }

    #[tokio::test]
    async fn failed_reply_is_still_acknowledged() {
        let chat = Arc::new(RecordingChat {
            fail_texts: true,
            ..RecordingChat::default()
        });
        let response = app(Arc::clone(&chat), None)
            .oneshot(post_update(text_update("hello"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
        assert!(chat.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_500_err() {
        let response = app(Arc::new(RecordingChat::default()), None)
            .oneshot(post_update("not json".to_owned(), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "ERR");
    }

    #[tokio::test]
    async fn wrong_secret_is_unauthorized() {
        let chat = Arc::new(RecordingChat::default());
        let router = app(Arc::clone(&chat), Some("s3cret"));

        let missing = router
            .clone()
            .oneshot(post_update(text_update("hello"), None))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let wrong = router
            .clone()
            .oneshot(post_update(text_update("hello"), Some("guess")))
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert!(chat.calls.lock().unwrap().is_empty());

        let right = router
            .oneshot(post_update(text_update("hello"), Some("s3cret")))
            .await
            .unwrap();
        assert_eq!(right.status(), StatusCode::OK);
    }
}
