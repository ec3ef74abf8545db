//! Telegram Bot API Client
//!
//! Thin wrapper over the Bot API methods the relay needs: `sendMessage`
//! (with an optional inline keyboard), `answerCallbackQuery`, and
//! `setWebhook`. Messages always go to the single fixed operator chat.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use relay_core::{Notifier, Session};

use crate::error::{Result, TelegramError};
use crate::format::order_summary;

const API_BASE: &str = "https://api.telegram.org";

/// Callback-data prefix for the "Generate payment link" button
pub(crate) const GENERATE_CALLBACK_PREFIX: &str = "genlink:";

/// Telegram client bound to one bot token and one operator chat
pub struct TelegramClient {
    http: reqwest::Client,
    token: String,
    chat_id: String,
    api_base: String,
}

impl TelegramClient {
    /// Create a new client
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
            chat_id: chat_id.into(),
            api_base: API_BASE.to_string(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| TelegramError::Config("TELEGRAM_BOT_TOKEN not set".into()))?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID")
            .map_err(|_| TelegramError::Config("TELEGRAM_CHAT_ID not set".into()))?;

        Ok(Self::new(token, chat_id))
    }

    /// Override the API host (test servers)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    async fn call<P: Serialize>(&self, method: &str, payload: &P) -> Result<serde_json::Value> {
        let response = self
            .http
            .post(self.method_url(method))
            .json(payload)
            .send()
            .await?;

        let body: ApiResponse = response.json().await?;
        if !body.ok {
            return Err(TelegramError::Api(
                body.description.unwrap_or_else(|| "unknown error".into()),
            ));
        }

        Ok(body.result.unwrap_or(serde_json::Value::Null))
    }

    /// Send an HTML message to the operator chat
    pub async fn send_message(
        &self,
        text: &str,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Result<()> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
            reply_markup,
        };
        self.call("sendMessage", &payload).await?;
        Ok(())
    }

    /// Acknowledge an inline-button press so the operator's client stops
    /// showing a spinner
    pub async fn answer_callback_query(&self, callback_query_id: &str, text: Option<&str>) -> Result<()> {
        let payload = AnswerCallbackQuery {
            callback_query_id,
            text,
        };
        self.call("answerCallbackQuery", &payload).await?;
        Ok(())
    }

    /// Register the relay's webhook URL with Telegram
    pub async fn set_webhook(&self, url: &str, secret_token: Option<&str>) -> Result<()> {
        let payload = SetWebhook { url, secret_token };
        self.call("setWebhook", &payload).await?;
        tracing::info!(webhook_url = %url, "Registered Telegram webhook");
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn notify_new_order(&self, session: &Session) -> relay_core::Result<()> {
        let keyboard = InlineKeyboardMarkup {
            inline_keyboard: vec![vec![InlineKeyboardButton {
                text: "Generate payment link".into(),
                callback_data: format!("{}{}", GENERATE_CALLBACK_PREFIX, session.id),
            }]],
        };

        self.send_message(&order_summary(session), Some(keyboard))
            .await
            .map_err(relay_core::RelayError::from)?;

        tracing::info!(session_id = %session.id, "Order alert sent to operator");
        Ok(())
    }

    async fn send_text(&self, text: &str) -> relay_core::Result<()> {
        self.send_message(text, None)
            .await
            .map_err(relay_core::RelayError::from)
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
struct AnswerCallbackQuery<'a> {
    callback_query_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SetWebhook<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_token: Option<&'a str>,
}

/// Inline keyboard attached to an order alert
#[derive(Clone, Debug, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}
