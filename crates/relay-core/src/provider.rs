//! Payment Provider Seam
//!
//! Fixed-price payment-creation capability: given an amount, currency, and
//! redirect target, returns a hosted payment page URL. Treated as an opaque
//! remote call with its own failure mode.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;

/// Inputs for a hosted payment page
#[derive(Clone, Debug)]
pub struct PaymentLinkRequest {
    /// Charge total in minor currency units
    pub amount_minor: i64,

    /// Uppercase ISO currency code
    pub currency: String,

    /// Human-readable charge description
    pub description: String,

    /// Where to send the customer after payment, when the session carries one
    pub redirect_url: Option<String>,

    /// Correlation metadata (session id, order id)
    pub metadata: HashMap<String, String>,
}

/// A hosted payment page returned by the provider
#[derive(Clone, Debug)]
pub struct PaymentLink {
    /// URL the customer's browser is redirected to
    pub url: String,

    /// Provider-side reference, when one exists
    pub provider_ref: Option<String>,
}

/// Payment-creation capability
#[async_trait]
pub trait PaymentLinkProvider: Send + Sync {
    /// Create a hosted payment page for a fixed amount.
    ///
    /// A failure here must not mutate any session; the caller reports it to
    /// the operator channel and leaves the session pending for retry.
    async fn create_payment_link(&self, request: PaymentLinkRequest) -> Result<PaymentLink>;

    /// Provider name for logs
    fn name(&self) -> &str;
}
