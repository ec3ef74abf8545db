//! Checkout Sessions
//!
//! A session is one in-flight checkout attempt awaiting a payment link.
//! Customer, cart, and amount are fixed at creation; the only mutation a
//! session ever sees is the attachment of its payment link.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a collision-resistant id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accept a caller-supplied id verbatim
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Customer contact and shipping details
///
/// All fields are required; `missing_fields` reports which ones are empty so
/// the submit handler can reject before a session is created.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
}

impl Customer {
    /// Names of required fields that are empty or whitespace-only
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let checks: [(&'static str, &str); 8] = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("postalCode", &self.postal_code),
            ("country", &self.country),
        ];
        for (name, value) in checks {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }
        missing
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// One cart line
///
/// Prices are in minor currency units. `line_price` takes precedence over
/// `price * quantity` when both are present.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartItem {
    pub title: String,
    pub quantity: u32,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub line_price: Option<i64>,
}

impl CartItem {
    /// Line total in minor units, if any price information is present.
    /// Overflowing `price * quantity` yields `None`; both fields come off
    /// the wire unvalidated.
    pub fn line_total_minor(&self) -> Option<i64> {
        self.line_price
            .or_else(|| {
                self.price
                    .and_then(|p| p.checked_mul(i64::from(self.quantity)))
            })
    }
}

/// Optional cart summary supplied by the presentation layer
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,

    /// Cart total in minor units; when present it overrides the caller's
    /// free-form amount
    #[serde(default)]
    pub total: Option<i64>,
}

/// Session lifecycle state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Pending,
    Resolved,
}

/// One checkout attempt awaiting a payment link
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: SessionId,

    /// Customer details (immutable once set)
    pub customer: Customer,

    /// Optional itemized cart
    pub cart: Option<Cart>,

    /// Charge total, normalized "X.YY" major-unit string
    pub amount: String,

    /// Uppercase ISO currency code
    pub currency: String,

    /// Passthrough order reference from the caller
    pub order_id: Option<String>,

    /// Where the payment provider should send the customer afterwards
    pub return_url: Option<String>,

    /// Absent until resolution; set exactly once
    pub payment_link: Option<String>,

    /// Lifecycle state, terminal once resolved
    pub state: SessionState,

    /// Creation timestamp, used only for expiry
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a pending session
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: SessionId,
        customer: Customer,
        cart: Option<Cart>,
        amount: impl Into<String>,
        currency: impl Into<String>,
        order_id: Option<String>,
        return_url: Option<String>,
    ) -> Self {
        Self {
            id,
            customer,
            cart,
            amount: amount.into(),
            currency: currency.into(),
            order_id,
            return_url,
            payment_link: None,
            state: SessionState::Pending,
            created_at: Utc::now(),
        }
    }

    /// Age of the session
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.created_at
    }

    pub fn is_resolved(&self) -> bool {
        self.state == SessionState::Resolved
    }
}
