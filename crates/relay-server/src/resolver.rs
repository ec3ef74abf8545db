//! Session Resolver
//!
//! Consumes inbound operator actions and turns them into session
//! resolutions. Two sources, one sink:
//!
//! - **Manual**: `/paylink <sessionId> <link...>` attaches the literal link.
//! - **Provider-assisted**: `/genlink <sessionId>` or the inline button
//!   callback asks the payment provider for a hosted checkout URL first.
//!
//! Both paths end in `SessionStore::resolve`. Failures are reported back to
//! the operator channel as diagnostics; nothing here mutates a session on a
//! failed provider call, and a resolved session is never overwritten.

use std::collections::HashMap;
use std::sync::Arc;

use relay_core::{
    Notifier, PaymentLinkProvider, PaymentLinkRequest, ResolveOutcome, Result, SessionId,
    SessionStore, money,
};
use relay_telegram::{OperatorAction, OperatorCommand, Update, parse_callback, parse_command};

/// What an update handled by the resolver amounted to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// A session was transitioned to resolved
    Resolved { session_id: String },

    /// A diagnostic was sent to the operator channel instead
    Diagnostic(String),

    /// Not an operator action for us
    Ignored,
}

/// Inbound operator-action handler
pub struct Resolver {
    store: Arc<dyn SessionStore>,
    notifier: Option<Arc<dyn Notifier>>,
    payments: Option<Arc<dyn PaymentLinkProvider>>,
}

impl Resolver {
    pub fn new(
        store: Arc<dyn SessionStore>,
        notifier: Option<Arc<dyn Notifier>>,
        payments: Option<Arc<dyn PaymentLinkProvider>>,
    ) -> Self {
        Self {
            store,
            notifier,
            payments,
        }
    }

    /// Handle one webhook update
    pub async fn handle_update(&self, update: &Update) -> Result<Resolution> {
        let Some(action) = update.operator_action() else {
            return Ok(Resolution::Ignored);
        };

        let command = match action {
            OperatorAction::Command { text } => match parse_command(&text) {
                Ok(command) => command,
                Err(e) => return self.diagnostic(format!("⚠️ {e}")).await,
            },
            OperatorAction::Callback { data, .. } => match parse_callback(&data) {
                Some(command) => command,
                // Foreign callback data, not ours to answer
                None => return Ok(Resolution::Ignored),
            },
        };

        match command {
            OperatorCommand::AttachLink { session_id, link } => {
                self.attach(&SessionId::from_string(session_id), &link).await
            }
            OperatorCommand::GenerateLink { session_id } => {
                self.generate(&SessionId::from_string(session_id)).await
            }
        }
    }

    /// Manual path: attach the operator-supplied link
    async fn attach(&self, id: &SessionId, link: &str) -> Result<Resolution> {
        match self.store.resolve(id, link)? {
            ResolveOutcome::Resolved(_) => self.confirm(id).await,
            ResolveOutcome::NotFound => {
                self.diagnostic(format!("⚠️ Unknown or expired session {id}"))
                    .await
            }
            ResolveOutcome::AlreadyResolved => {
                self.diagnostic(format!("⚠️ Session {id} already has a payment link"))
                    .await
            }
        }
    }

    /// Provider-assisted path: create a hosted checkout page, then resolve
    async fn generate(&self, id: &SessionId) -> Result<Resolution> {
        // Check the session before calling out; no charge attempts against
        // unknown sessions.
        let Some(session) = self.store.get(id)? else {
            return self
                .diagnostic(format!("⚠️ Unknown or expired session {id}"))
                .await;
        };
        if session.is_resolved() {
            return self
                .diagnostic(format!("⚠️ Session {id} already has a payment link"))
                .await;
        }

        let Some(payments) = &self.payments else {
            return self
                .diagnostic(format!(
                    "⚠️ No payment provider configured. Attach a link manually: /paylink {id} <link>"
                ))
                .await;
        };

        let Some(amount_minor) = money::parse_major(&session.amount) else {
            return self
                .diagnostic(format!(
                    "⚠️ Session {id} has an unparseable amount '{}'",
                    session.amount
                ))
                .await;
        };

        let description = match &session.order_id {
            Some(order_id) => format!("Order {order_id}"),
            None => format!("Checkout {id}"),
        };

        let mut metadata = HashMap::new();
        metadata.insert("relay_session_id".to_string(), id.to_string());
        if let Some(order_id) = &session.order_id {
            metadata.insert("order_id".to_string(), order_id.clone());
        }

        let request = PaymentLinkRequest {
            amount_minor,
            currency: session.currency.clone(),
            description,
            redirect_url: session.return_url.clone(),
            metadata,
        };

        let link = match payments.create_payment_link(request).await {
            Ok(link) => link,
            Err(e) => {
                tracing::error!(session_id = %id, error = %e, "Payment provider call failed");
                // Session left pending for retry
                return self
                    .diagnostic(format!("⚠️ Payment provider call failed for session {id}: {e}"))
                    .await;
            }
        };

        match self.store.resolve(id, &link.url)? {
            ResolveOutcome::Resolved(_) => self.confirm(id).await,
            // Swept or raced between get and resolve
            ResolveOutcome::NotFound => {
                self.diagnostic(format!("⚠️ Session {id} expired before the link was attached"))
                    .await
            }
            ResolveOutcome::AlreadyResolved => {
                self.diagnostic(format!("⚠️ Session {id} was resolved concurrently; generated link discarded"))
                    .await
            }
        }
    }

    async fn confirm(&self, id: &SessionId) -> Result<Resolution> {
        tracing::info!(session_id = %id, "Session resolved");
        self.send(format!("✅ Payment link attached to session {id}"))
            .await;
        Ok(Resolution::Resolved {
            session_id: id.to_string(),
        })
    }

    async fn diagnostic(&self, text: String) -> Result<Resolution> {
        tracing::warn!(diagnostic = %text, "Operator action rejected");
        self.send(text.clone()).await;
        Ok(Resolution::Diagnostic(text))
    }

    async fn send(&self, text: String) {
        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.send_text(&text).await {
                tracing::warn!(error = %e, "Failed to reach operator channel");
            }
        }
    }
}
