//! # relay-telegram
//!
//! Telegram Bot API integration for checkout-relay: the outbound operator
//! channel (order alerts with an inline "Generate payment link" button,
//! diagnostics) and the inbound update types and command grammar the
//! resolver consumes.
//!
//! Everything speaks the plain Bot API over `reqwest`; there is no long
//! polling — updates arrive on the relay's own webhook endpoint.

mod client;
mod command;
mod error;
mod format;
mod update;

pub use client::{InlineKeyboardButton, InlineKeyboardMarkup, TelegramClient};
pub use command::{CommandError, OperatorCommand, parse_callback, parse_command};
pub use error::{Result, TelegramError};
pub use format::order_summary;
pub use update::{CallbackQuery, Chat, IncomingMessage, OperatorAction, Update};
