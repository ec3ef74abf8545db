//! Error Types

use thiserror::Error;

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;

/// Relay error types
#[derive(Error, Debug)]
pub enum RelayError {
    /// Required customer fields missing or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Session id collision on create
    #[error("Duplicate session: {0}")]
    DuplicateSession(String),

    /// Resolve or query against an unknown/expired session
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Outbound operator notification failed
    #[error("Notification dispatch failed: {0}")]
    Notify(String),

    /// Payment provider call failed
    #[error("Payment provider error: {0}")]
    Provider(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RelayError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, RelayError::Notify(_) | RelayError::Provider(_))
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            RelayError::Validation(msg) => format!("Invalid submission: {}", msg),
            RelayError::DuplicateSession(_) => "This checkout was already submitted.".into(),
            RelayError::SessionNotFound(_) => "Checkout session not found or expired.".into(),
            RelayError::Notify(_) => "Order received, but the operator could not be notified.".into(),
            RelayError::Provider(_) => "Payment link creation failed. Please try again.".into(),
            RelayError::Config(_) => "Service configuration error.".into(),
            _ => "An unexpected error occurred.".into(),
        }
    }
}
