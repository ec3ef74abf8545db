//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Stripe API error
    #[error("Stripe error: {0}")]
    Stripe(String),

    /// Currency the provider integration does not handle
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// Amount outside what a checkout session accepts
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<PaymentError> for relay_core::RelayError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Config(msg) => relay_core::RelayError::Config(msg),
            other => relay_core::RelayError::Provider(other.to_string()),
        }
    }
}
