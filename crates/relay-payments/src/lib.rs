//! # relay-payments
//!
//! Stripe hosted-checkout integration for checkout-relay.
//!
//! The relay never collects card data. When the operator asks for a
//! generated link, this crate creates a one-time (mode=payment) Stripe
//! Checkout session for the session's fixed amount and hands back the hosted
//! page URL, which becomes the session's payment link:
//!
//! ```text
//! ┌──────────────┐     ┌─────────────────┐     ┌──────────────┐
//! │   Customer   │────▶│  Stripe Hosted  │────▶│  return_url  │
//! │   browser    │     │  Checkout Page  │     │  (merchant)  │
//! └──────────────┘     └─────────────────┘     └──────────────┘
//! ```

mod checkout;
mod error;

pub use checkout::StripeClient;
pub use error::{PaymentError, Result};
