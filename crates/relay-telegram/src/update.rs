//! Inbound Update Types
//!
//! The subset of Telegram's `Update` object the relay cares about: text
//! messages (operator commands) and callback queries (inline-button
//! presses). Everything else deserializes fine and is ignored.

use serde::{Deserialize, Serialize};

/// A webhook delivery from Telegram
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

/// A chat message
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub chat: Option<Chat>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Chat {
    #[serde(default)]
    pub id: i64,
}

/// An inline-button press
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub data: Option<String>,
}

/// An operator action extracted from an update
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperatorAction {
    /// A slash command typed into the operator chat
    Command { text: String },

    /// An inline-button press; `callback_id` is needed to acknowledge it
    Callback { callback_id: String, data: String },
}

impl Update {
    /// Extract the operator action, if this update carries one.
    ///
    /// Plain chatter (non-command text), edits, and other update kinds
    /// return `None` and are ignored by the resolver.
    pub fn operator_action(&self) -> Option<OperatorAction> {
        if let Some(callback) = &self.callback_query {
            let data = callback.data.clone()?;
            return Some(OperatorAction::Callback {
                callback_id: callback.id.clone(),
                data,
            });
        }

        let text = self.message.as_ref()?.text.as_deref()?.trim();
        if text.starts_with('/') {
            return Some(OperatorAction::Command { text: text.to_string() });
        }

        None
    }
}
