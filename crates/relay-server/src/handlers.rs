//! HTTP Handlers
//!
//! Wire contract (paths and JSON field names) kept compatible with the
//! checkout pages that already post here:
//!
//! - `POST /api/submit-customer-info` — create a session, alert the operator
//! - `GET  /api/check-payment-link/{sessionId}` — the browser polling loop
//! - `POST /webhook/telegram` — operator actions arriving from Telegram
//! - `GET  /set-webhook` — register this deployment's webhook with Telegram

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use relay_core::{Cart, Customer, PollStatus, RelayError, Session, SessionId, money};
use relay_telegram::{OperatorAction, Update};

use crate::state::AppState;

/// Header Telegram echoes the configured webhook secret in
const TELEGRAM_SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Serialize)]
pub struct RootResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub payments_configured: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    /// Pre-allocated id from the checkout page's polling script, if any
    #[serde(default)]
    pub session_id: Option<String>,

    #[serde(default)]
    pub customer_data: Customer,

    #[serde(default)]
    pub cart: Option<Cart>,

    /// Major-unit amount string; overridden by the cart total when present
    #[serde(default)]
    pub amount: Option<String>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub order_id: Option<String>,

    #[serde(default)]
    pub return_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub status: &'static str,
    pub session_id: String,

    /// False when the operator alert could not be dispatched; the session
    /// exists either way
    pub notified: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_link: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetWebhookResponse {
    pub status: &'static str,
    pub webhook_url: String,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, code: &str, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
            code: code.into(),
        }),
    )
}

// ============================================================================
// Router
// ============================================================================

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/submit-customer-info", post(submit))
        .route("/api/check-payment-link/{session_id}", get(check_payment_link))
        .route("/webhook/telegram", post(telegram_webhook))
        .route("/set-webhook", get(set_webhook))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        status: "active",
        message: "Running",
    })
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        payments_configured: state.payments_configured,
    })
}

/// Submit operation: validate, create the session, alert the operator.
///
/// Notification is best-effort: a dispatch failure is logged and reported as
/// `notified: false`, never as a failed request.
async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, HandlerError> {
    let missing = payload.customer_data.missing_fields();
    if !missing.is_empty() {
        return Err(error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            format!("Missing required fields: {}", missing.join(", ")),
        ));
    }

    let amount = normalize_amount(payload.cart.as_ref(), payload.amount.as_deref())
        .ok_or_else(|| {
            error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                "Missing or unparseable amount",
            )
        })?;

    let currency = payload
        .currency
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or("EUR")
        .to_uppercase();

    let id = match payload.session_id.filter(|s| !s.trim().is_empty()) {
        Some(id) => SessionId::from_string(id.trim()),
        None => SessionId::generate(),
    };

    let session = Session::new(
        id.clone(),
        payload.customer_data,
        payload.cart,
        amount,
        currency,
        payload.order_id,
        payload.return_url,
    );

    state.store.create(session.clone()).map_err(|e| match e {
        RelayError::DuplicateSession(id) => error(
            StatusCode::CONFLICT,
            "DUPLICATE_SESSION",
            format!("Session {id} already exists"),
        ),
        other => error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "STORAGE_ERROR",
            other.user_message(),
        ),
    })?;

    tracing::info!(session_id = %id, amount = %session.amount, currency = %session.currency, "Session created");

    let notified = match &state.notifier {
        Some(notifier) => match notifier.notify_new_order(&session).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(session_id = %id, error = %e, "Operator notification failed");
                false
            }
        },
        None => {
            tracing::warn!(session_id = %id, "No operator channel configured; order not announced");
            false
        }
    };

    Ok(Json(SubmitResponse {
        status: "success",
        session_id: id.to_string(),
        notified,
    }))
}

/// Poller-facing query: three observable states, always HTTP 200.
async fn check_payment_link(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<PollResponse>, HandlerError> {
    let status = state
        .store
        .status(&SessionId::from_string(session_id))
        .map_err(|e| {
            error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                e.user_message(),
            )
        })?;

    Ok(Json(match status {
        PollStatus::NotFound => PollResponse {
            status: "not_found",
            payment_link: None,
        },
        PollStatus::Waiting => PollResponse {
            status: "waiting",
            payment_link: None,
        },
        PollStatus::Ready { payment_link } => PollResponse {
            status: "ready",
            payment_link: Some(payment_link),
        },
    }))
}

/// Resolve webhook: operator actions delivered by Telegram.
///
/// Replies 200 on every handled outcome (including diagnostics) so Telegram
/// does not redeliver the update.
async fn telegram_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<Update>,
) -> Result<&'static str, HandlerError> {
    if let Some(secret) = &state.config.webhook_secret {
        let presented = headers
            .get(TELEGRAM_SECRET_HEADER)
            .and_then(|v| v.to_str().ok());
        if presented != Some(secret.as_str()) {
            return Err(error(
                StatusCode::UNAUTHORIZED,
                "BAD_WEBHOOK_SECRET",
                "Webhook secret mismatch",
            ));
        }
    }

    // Stop the operator's client spinner regardless of the outcome
    if let (Some(telegram), Some(OperatorAction::Callback { callback_id, .. })) =
        (&state.telegram, update.operator_action())
    {
        if let Err(e) = telegram.answer_callback_query(&callback_id, None).await {
            tracing::warn!(error = %e, "Failed to acknowledge callback query");
        }
    }

    state.resolver.handle_update(&update).await.map_err(|e| {
        tracing::error!(error = %e, "Webhook processing error");
        error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "WEBHOOK_ERROR",
            e.user_message(),
        )
    })?;

    Ok("OK")
}

/// Register `{APP_URL}/webhook/telegram` with Telegram.
async fn set_webhook(State(state): State<AppState>) -> Result<Json<SetWebhookResponse>, HandlerError> {
    let telegram = state.telegram.as_ref().ok_or_else(|| {
        error(
            StatusCode::SERVICE_UNAVAILABLE,
            "TELEGRAM_DISABLED",
            "Telegram is not configured",
        )
    })?;

    let app_url = state.config.app_url.as_deref().ok_or_else(|| {
        error(
            StatusCode::SERVICE_UNAVAILABLE,
            "APP_URL_UNSET",
            "APP_URL is not configured",
        )
    })?;

    let webhook_url = format!("{}/webhook/telegram", app_url.trim_end_matches('/'));
    telegram
        .set_webhook(&webhook_url, state.config.webhook_secret.as_deref())
        .await
        .map_err(|e| {
            error(
                StatusCode::BAD_GATEWAY,
                "SET_WEBHOOK_FAILED",
                e.to_string(),
            )
        })?;

    Ok(Json(SetWebhookResponse {
        status: "success",
        webhook_url,
    }))
}

/// Normalize the charge total: a cart total wins over the free-form amount.
fn normalize_amount(cart: Option<&Cart>, amount: Option<&str>) -> Option<String> {
    if let Some(total) = cart.and_then(|c| c.total) {
        // same non-negative rule parse_major applies to the free-form amount
        if total < 0 {
            return None;
        }
        return Some(money::format_minor(total));
    }
    amount
        .and_then(money::parse_major)
        .map(money::format_minor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use relay_core::MemorySessionStore;

    use crate::config::ServerConfig;
    use crate::resolver::Resolver;
    use crate::resolver::doubles::{RecordingNotifier, StaticLinkProvider};

    fn test_state(notifier: Arc<RecordingNotifier>, webhook_secret: Option<&str>) -> AppState {
        let store = Arc::new(MemorySessionStore::new());
        let provider = Arc::new(StaticLinkProvider::new("https://checkout.example/cs_1"));
        let resolver = Arc::new(Resolver::new(
            store.clone(),
            Some(notifier.clone()),
            Some(provider),
        ));
        let config = ServerConfig {
            webhook_secret: webhook_secret.map(String::from),
            ..ServerConfig::default()
        };

        AppState {
            store,
            notifier: Some(notifier),
            resolver,
            telegram: None,
            payments_configured: true,
            config: Arc::new(config),
        }
    }

    fn app(notifier: Arc<RecordingNotifier>) -> Router {
        router(test_state(notifier, None))
    }

    async fn request_json(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::String(
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        };
        (status, json)
    }

    fn submit_body(session_id: &str) -> serde_json::Value {
        serde_json::json!({
            "sessionId": session_id,
            "customerData": {
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "phone": "+353870000000",
                "address": "1 Fairview Ave",
                "city": "Dublin",
                "postalCode": "D03",
                "country": "Ireland",
            },
            "cart": {
                "items": [
                    { "title": "Lip Gloss", "quantity": 2, "price": 750 },
                    { "title": "Mascara", "quantity": 1, "line_price": 1000 },
                ],
                "total": 2500,
            },
            "amount": "99.99",
            "currency": "EUR",
        })
    }

    #[tokio::test]
    async fn test_full_checkout_scenario() {
        let notifier = Arc::new(RecordingNotifier::default());
        let app = app(notifier.clone());

        // Submit: cart total (25.00) wins over the free-form amount
        let (status, body) = request_json(
            &app,
            "POST",
            "/api/submit-customer-info",
            Some(submit_body("1000")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["sessionId"], "1000");
        assert_eq!(body["notified"], true);
        assert_eq!(notifier.orders.lock().unwrap().as_slice(), ["1000"]);

        // Poll before resolution
        let (status, body) =
            request_json(&app, "GET", "/api/check-payment-link/1000", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "waiting");
        assert!(body.get("paymentLink").is_none());

        // Operator attaches a link via the webhook
        let update = serde_json::json!({
            "update_id": 1,
            "message": { "text": "/paylink 1000 https://pay.example/abc", "chat": { "id": 42 } }
        });
        let (status, body) =
            request_json(&app, "POST", "/webhook/telegram", Some(update)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::Value::String("OK".into()));

        // Poll after resolution
        let (status, body) =
            request_json(&app, "GET", "/api/check-payment-link/1000", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
        assert_eq!(body["paymentLink"], "https://pay.example/abc");
    }

    #[tokio::test]
    async fn test_submit_rejects_missing_fields_before_creating_a_session() {
        let app = app(Arc::new(RecordingNotifier::default()));

        let mut body = submit_body("2000");
        body["customerData"]["email"] = serde_json::Value::String(String::new());
        body["customerData"]["phone"] = serde_json::Value::String("  ".into());

        let (status, body) =
            request_json(&app, "POST", "/api/submit-customer-info", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["error"].as_str().unwrap().contains("email"));
        assert!(body["error"].as_str().unwrap().contains("phone"));

        // No session was created
        let (_, body) = request_json(&app, "GET", "/api/check-payment-link/2000", None).await;
        assert_eq!(body["status"], "not_found");
    }

    #[tokio::test]
    async fn test_submit_without_any_amount_is_rejected() {
        let app = app(Arc::new(RecordingNotifier::default()));

        let mut body = submit_body("3000");
        body["cart"]["total"] = serde_json::Value::Null;
        body["amount"] = serde_json::Value::Null;

        let (status, body) =
            request_json(&app, "POST", "/api/submit-customer-info", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_duplicate_submit_conflicts() {
        let app = app(Arc::new(RecordingNotifier::default()));

        let (status, _) =
            request_json(&app, "POST", "/api/submit-customer-info", Some(submit_body("4000"))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) =
            request_json(&app, "POST", "/api/submit-customer-info", Some(submit_body("4000"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "DUPLICATE_SESSION");
    }

    #[tokio::test]
    async fn test_submit_generates_an_id_when_none_is_supplied() {
        let app = app(Arc::new(RecordingNotifier::default()));

        let mut body = submit_body("");
        body["sessionId"] = serde_json::Value::Null;

        let (status, body) =
            request_json(&app, "POST", "/api/submit-customer-info", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body["sessionId"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notification_failure_degrades_but_does_not_fail_submit() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let app = app(notifier);

        let (status, body) =
            request_json(&app, "POST", "/api/submit-customer-info", Some(submit_body("5000"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["notified"], false);

        // The session exists despite the failed alert
        let (_, body) = request_json(&app, "GET", "/api/check-payment-link/5000", None).await;
        assert_eq!(body["status"], "waiting");
    }

    #[tokio::test]
    async fn test_webhook_secret_is_enforced() {
        let notifier = Arc::new(RecordingNotifier::default());
        let app = router(test_state(notifier, Some("s3cret")));

        let update = serde_json::json!({
            "update_id": 1,
            "message": { "text": "/paylink 1000 https://pay.example/abc", "chat": { "id": 42 } }
        });

        // Missing header
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook/telegram")
                    .header("content-type", "application/json")
                    .body(Body::from(update.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Correct header
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook/telegram")
                    .header("content-type", "application/json")
                    .header("x-telegram-bot-api-secret-token", "s3cret")
                    .body(Body::from(update.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_and_root() {
        let app = app(Arc::new(RecordingNotifier::default()));

        let (status, body) = request_json(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["paymentsConfigured"], true);

        let (status, body) = request_json(&app, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "active");
    }

    #[tokio::test]
    async fn test_set_webhook_unavailable_without_telegram() {
        let app = app(Arc::new(RecordingNotifier::default()));

        let (status, body) = request_json(&app, "GET", "/set-webhook", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "TELEGRAM_DISABLED");
    }

    #[test]
    fn test_normalize_amount() {
        let cart = Cart {
            items: vec![],
            total: Some(2500),
        };
        assert_eq!(normalize_amount(Some(&cart), Some("99.99")), Some("25.00".into()));
        assert_eq!(normalize_amount(None, Some("99.99")), Some("99.99".into()));
        assert_eq!(normalize_amount(None, Some("bogus")), None);
        assert_eq!(normalize_amount(None, None), None);
    }

    #[test]
    fn test_normalize_amount_rejects_negative_cart_total() {
        let cart = Cart {
            items: vec![],
            total: Some(-100),
        };
        assert_eq!(normalize_amount(Some(&cart), None), None);
        // a valid fallback amount does not rescue a negative total
        assert_eq!(normalize_amount(Some(&cart), Some("25.00")), None);
        assert_eq!(normalize_amount(None, Some("-25.00")), None);
    }
}
