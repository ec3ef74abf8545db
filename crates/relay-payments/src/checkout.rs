//! Stripe Checkout Integration
//!
//! Creates one-time hosted checkout sessions: fixed amount, fixed currency,
//! one line item, the relay session id in metadata for reconciliation.

use async_trait::async_trait;
use stripe::{
    CheckoutSession as StripeCheckoutSession, CheckoutSessionMode, Client,
    CreateCheckoutSession, CreateCheckoutSessionLineItems,
    CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData, Currency,
};

use relay_core::{PaymentLink, PaymentLinkProvider, PaymentLinkRequest};

use crate::error::{PaymentError, Result};

/// Stripe client wrapper
pub struct StripeClient {
    client: Client,

    /// Redirect target used when a session carries no return URL of its own
    fallback_redirect: Option<String>,
}

impl StripeClient {
    /// Create a new Stripe client
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
            fallback_redirect: None,
        }
    }

    /// Set the redirect target for sessions without a return URL
    pub fn with_fallback_redirect(mut self, url: impl Into<String>) -> Self {
        self.fallback_redirect = Some(url.into());
        self
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;

        let mut client = Self::new(&secret_key);
        if let Ok(url) = std::env::var("CHECKOUT_SUCCESS_URL") {
            client = client.with_fallback_redirect(url);
        }

        Ok(client)
    }

    async fn create_session(&self, request: &PaymentLinkRequest) -> Result<PaymentLink> {
        if request.amount_minor <= 0 {
            return Err(PaymentError::InvalidAmount(request.amount_minor.to_string()));
        }
        let currency = currency_from_code(&request.currency)?;

        let redirect = request
            .redirect_url
            .as_deref()
            .or(self.fallback_redirect.as_deref())
            .ok_or_else(|| {
                PaymentError::Config("no redirect URL for checkout session".into())
            })?;

        let mut params = CreateCheckoutSession::new();
        params.mode = Some(CheckoutSessionMode::Payment);
        params.success_url = Some(redirect);
        params.cancel_url = Some(redirect);
        params.metadata = Some(request.metadata.clone());

        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            quantity: Some(1),
            price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                currency,
                unit_amount: Some(request.amount_minor),
                product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                    name: request.description.clone(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]);

        let session = StripeCheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::Stripe("No checkout URL returned".into()))?;

        Ok(PaymentLink {
            url,
            provider_ref: Some(session.id.to_string()),
        })
    }
}

#[async_trait]
impl PaymentLinkProvider for StripeClient {
    async fn create_payment_link(
        &self,
        request: PaymentLinkRequest,
    ) -> relay_core::Result<PaymentLink> {
        let link = self.create_session(&request).await?;
        tracing::info!(
            provider_ref = ?link.provider_ref,
            amount_minor = request.amount_minor,
            currency = %request.currency,
            "Created hosted checkout session"
        );
        Ok(link)
    }

    fn name(&self) -> &str {
        "Stripe"
    }
}

/// Map an ISO currency code to the Stripe currency enum
fn currency_from_code(code: &str) -> Result<Currency> {
    match code.to_ascii_lowercase().as_str() {
        "eur" => Ok(Currency::EUR),
        "usd" => Ok(Currency::USD),
        "gbp" => Ok(Currency::GBP),
        "chf" => Ok(Currency::CHF),
        "sek" => Ok(Currency::SEK),
        "nok" => Ok(Currency::NOK),
        "dkk" => Ok(Currency::DKK),
        "pln" => Ok(Currency::PLN),
        "czk" => Ok(Currency::CZK),
        "cad" => Ok(Currency::CAD),
        "aud" => Ok(Currency::AUD),
        other => Err(PaymentError::UnsupportedCurrency(other.to_uppercase())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_mapping() {
        assert_eq!(currency_from_code("EUR").unwrap(), Currency::EUR);
        assert_eq!(currency_from_code("eur").unwrap(), Currency::EUR);
        assert_eq!(currency_from_code("usd").unwrap(), Currency::USD);
        assert!(matches!(
            currency_from_code("XTS"),
            Err(PaymentError::UnsupportedCurrency(_))
        ));
    }

    #[tokio::test]
    async fn test_zero_amount_rejected_before_any_network_call() {
        let client = StripeClient::new("sk_test_unused");
        let request = PaymentLinkRequest {
            amount_minor: 0,
            currency: "EUR".into(),
            description: "Order 1000".into(),
            redirect_url: Some("https://shop.example/thanks".into()),
            metadata: std::collections::HashMap::new(),
        };

        let err = client.create_session(&request).await.unwrap_err();
        assert!(matches!(err, PaymentError::InvalidAmount(_)));
    }

    #[tokio::test]
    async fn test_missing_redirect_is_config_error() {
        let client = StripeClient::new("sk_test_unused");
        let request = PaymentLinkRequest {
            amount_minor: 2500,
            currency: "EUR".into(),
            description: "Order 1000".into(),
            redirect_url: None,
            metadata: std::collections::HashMap::new(),
        };

        let err = client.create_session(&request).await.unwrap_err();
        assert!(matches!(err, PaymentError::Config(_)));
    }
}
