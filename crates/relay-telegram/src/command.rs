//! Operator Command Grammar
//!
//! Small explicit grammar for the two resolution commands instead of ad hoc
//! string splitting:
//!
//! ```text
//! /paylink <sessionId> <link...>   attach a link manually
//! /genlink <sessionId>             create one via the payment provider
//! ```
//!
//! Tokens after the session id of `/paylink` are rejoined verbatim as the
//! link. Callback data from the inline button uses `genlink:<sessionId>`.

use thiserror::Error;

use crate::client::GENERATE_CALLBACK_PREFIX;

/// Command names (with and without the leading slash)
const ATTACH_COMMAND: &str = "/paylink";
const GENERATE_COMMAND: &str = "/genlink";

/// A parsed resolution command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperatorCommand {
    /// Manual resolution: attach a literal link
    AttachLink { session_id: String, link: String },

    /// Provider-assisted resolution: generate a hosted payment page
    GenerateLink { session_id: String },
}

/// Why a command failed to parse
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Known commands: /paylink, /genlink")]
    UnknownCommand(String),

    #[error("Missing session id. Usage: {0} <sessionId>")]
    MissingSessionId(&'static str),

    #[error("Missing payment link. Usage: /paylink <sessionId> <link>")]
    MissingLink,

    #[error("Unexpected arguments. Usage: /genlink <sessionId>")]
    UnexpectedArguments,
}

/// Parse an operator slash command.
pub fn parse_command(text: &str) -> Result<OperatorCommand, CommandError> {
    let mut tokens = text.split_whitespace();
    let command = tokens.next().unwrap_or_default();

    // "/paylink@MyBot" addressing is stripped before matching
    let bare = command.split('@').next().unwrap_or(command);

    match bare {
        ATTACH_COMMAND => {
            let session_id = tokens
                .next()
                .ok_or(CommandError::MissingSessionId(ATTACH_COMMAND))?;
            let link_tokens: Vec<&str> = tokens.collect();
            if link_tokens.is_empty() {
                return Err(CommandError::MissingLink);
            }
            Ok(OperatorCommand::AttachLink {
                session_id: session_id.to_string(),
                link: link_tokens.join(" "),
            })
        }
        GENERATE_COMMAND => {
            let session_id = tokens
                .next()
                .ok_or(CommandError::MissingSessionId(GENERATE_COMMAND))?;
            if tokens.next().is_some() {
                return Err(CommandError::UnexpectedArguments);
            }
            Ok(OperatorCommand::GenerateLink {
                session_id: session_id.to_string(),
            })
        }
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

/// Parse inline-button callback data. Returns `None` for foreign callbacks.
pub fn parse_callback(data: &str) -> Option<OperatorCommand> {
    let session_id = data.strip_prefix(GENERATE_CALLBACK_PREFIX)?.trim();
    if session_id.is_empty() {
        return None;
    }
    Some(OperatorCommand::GenerateLink {
        session_id: session_id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_link() {
        let cmd = parse_command("/paylink 1000 https://pay.example/abc").unwrap();
        assert_eq!(
            cmd,
            OperatorCommand::AttachLink {
                session_id: "1000".into(),
                link: "https://pay.example/abc".into(),
            }
        );
    }

    #[test]
    fn test_attach_link_rejoins_trailing_tokens() {
        let cmd = parse_command("/paylink 1000 https://pay.example/abc ref 42").unwrap();
        assert_eq!(
            cmd,
            OperatorCommand::AttachLink {
                session_id: "1000".into(),
                link: "https://pay.example/abc ref 42".into(),
            }
        );
    }

    #[test]
    fn test_attach_without_link_is_diagnostic() {
        // Session id but no link tokens: parse failure, never a resolution
        assert_eq!(parse_command("/paylink 1000"), Err(CommandError::MissingLink));
    }

    #[test]
    fn test_attach_without_session_id() {
        assert_eq!(
            parse_command("/paylink"),
            Err(CommandError::MissingSessionId("/paylink"))
        );
    }

    #[test]
    fn test_generate_link() {
        let cmd = parse_command("/genlink 1000").unwrap();
        assert_eq!(cmd, OperatorCommand::GenerateLink { session_id: "1000".into() });
    }

    #[test]
    fn test_generate_rejects_extra_tokens() {
        assert_eq!(
            parse_command("/genlink 1000 extra"),
            Err(CommandError::UnexpectedArguments)
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse_command("/refund 1000"),
            Err(CommandError::UnknownCommand("/refund".into()))
        );
    }

    #[test]
    fn test_bot_addressed_command() {
        let cmd = parse_command("/genlink@CheckoutRelayBot 1000").unwrap();
        assert_eq!(cmd, OperatorCommand::GenerateLink { session_id: "1000".into() });
    }

    #[test]
    fn test_callback_data() {
        assert_eq!(
            parse_callback("genlink:1000"),
            Some(OperatorCommand::GenerateLink { session_id: "1000".into() })
        );
        assert_eq!(parse_callback("genlink:"), None);
        assert_eq!(parse_callback("other:1000"), None);
    }
}
