//! # relay-core
//!
//! Domain types and integration seams for the checkout-handoff relay.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      checkout-relay                           │
//! │  ┌──────────────┐  ┌──────────────┐  ┌────────────────────┐  │
//! │  │ SessionStore │  │   Notifier   │  │ PaymentLinkProvider│  │
//! │  │  (pending →  │──│  (operator   │──│  (hosted checkout  │  │
//! │  │   resolved)  │  │   channel)   │  │   URL on demand)   │  │
//! │  └──────────────┘  └──────────────┘  └────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The browser submits customer data, which creates a `pending` session and
//! fires a best-effort notification to the operator channel. The operator
//! (or a payment provider called on the operator's behalf) resolves the
//! session with a payment link; the browser's polling loop observes the
//! resolved state and redirects.
//!
//! The `Notifier` and `PaymentLinkProvider` traits let the server swap the
//! Telegram and Stripe integrations for test doubles without touching the
//! correlation logic.

pub mod error;
pub mod money;
pub mod notify;
pub mod provider;
pub mod session;
pub mod store;

pub use error::{RelayError, Result};
pub use notify::Notifier;
pub use provider::{PaymentLink, PaymentLinkProvider, PaymentLinkRequest};
pub use session::{Cart, CartItem, Customer, Session, SessionId, SessionState};
pub use store::{MemorySessionStore, PollStatus, ResolveOutcome, SessionStore};
