//! Operator Message Formatting
//!
//! HTML order summaries for the operator chat. Customer-supplied fields are
//! escaped; parse_mode is HTML.

use relay_core::{Session, money};

/// Escape text for Telegram HTML parse mode
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render the new-order alert for a session
pub fn order_summary(session: &Session) -> String {
    let mut out = String::new();

    out.push_str("🔔 <b>NEW ORDER</b>\n\n");
    out.push_str(&format!(
        "💰 <b>Amount:</b> {} {}\n",
        escape_html(&session.amount),
        escape_html(&session.currency)
    ));

    if let Some(order_id) = &session.order_id {
        out.push_str(&format!("🧾 <b>Order:</b> {}\n", escape_html(order_id)));
    }

    if let Some(cart) = &session.cart {
        if !cart.items.is_empty() {
            out.push('\n');
            for item in &cart.items {
                match item.line_total_minor() {
                    Some(total) => out.push_str(&format!(
                        "{} × {}: {}\n",
                        item.quantity,
                        escape_html(&item.title),
                        money::format_minor(total)
                    )),
                    None => out.push_str(&format!(
                        "{} × {}\n",
                        item.quantity,
                        escape_html(&item.title)
                    )),
                }
            }
        }
    }

    let c = &session.customer;
    out.push_str(&format!(
        "\n👤 <b>Customer:</b>\n{}\n{}\n{}\n{}\n{}, {}\n{}\n",
        escape_html(&c.full_name()),
        escape_html(&c.email),
        escape_html(&c.phone),
        escape_html(&c.address),
        escape_html(&c.city),
        escape_html(&c.postal_code),
        escape_html(&c.country)
    ));

    out.push_str(&format!(
        "\n🔑 <b>Session:</b> <code>{}</code>\n",
        escape_html(session.id.as_str())
    ));
    out.push_str(&format!(
        "Reply <code>/paylink {} &lt;link&gt;</code> or press the button below.",
        escape_html(session.id.as_str())
    ));

    out
}
