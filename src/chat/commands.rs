//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending messages
//! to the service. Each command maps to one session operation.

use crate::types::{MAX_RESULT_COUNT, MIN_RESULT_COUNT};

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the service.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Reset the conversation to the greeting.
    Clear,

    /// Turn diagnostic mode on or off.
    Diagnostic(bool),

    /// Set the number of documents to retrieve.
    TopK(u32),

    /// Set the relevance threshold.
    Threshold(f32),

    /// Expand or collapse one evidence document.
    Expand(String),

    /// Show the evidence for the latest answer.
    Documents,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Display session statistics.
    Stats,

    /// Show the current configuration.
    ShowConfig,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use ragchat::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/topk 5").is_some());
/// assert!(parse_command("Salut!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    let rest = input.strip_prefix('/')?;
    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "clear" => ChatCommand::Clear,
        "diagnostic" | "test" => match argument.and_then(parse_on_off) {
            Some(value) => ChatCommand::Diagnostic(value),
            None => ChatCommand::Invalid(format!("/{command} expects 'on' or 'off'")),
        },
        "topk" | "top_k" => match argument {
            Some(arg) => match parse_u32_in_range(arg, MIN_RESULT_COUNT, MAX_RESULT_COUNT) {
                Ok(value) => ChatCommand::TopK(value),
                Err(err) => ChatCommand::Invalid(format!("/topk {err}")),
            },
            None => ChatCommand::Invalid("/topk requires a value".to_string()),
        },
        "threshold" => match argument {
            Some(arg) => match parse_f32_in_range(arg, 0.0, 1.0) {
                Ok(value) => ChatCommand::Threshold(value),
                Err(err) => ChatCommand::Invalid(format!("/threshold {err}")),
            },
            None => ChatCommand::Invalid("/threshold requires a value".to_string()),
        },
        "expand" => match argument {
            Some(id) => ChatCommand::Expand(id.to_string()),
            None => ChatCommand::Invalid("/expand requires a document id".to_string()),
        },
        "docs" | "documents" => ChatCommand::Documents,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "stats" | "status" => ChatCommand::Stats,
        "config" => ChatCommand::ShowConfig,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_u32_in_range(value: &str, min: u32, max: u32) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(parsed) if (min..=max).contains(&parsed) => Ok(parsed),
        _ => Err(format!("expects an integer between {min} and {max}")),
    }
}

fn parse_f32_in_range(value: &str, min: f32, max: f32) -> Result<f32, String> {
    let parsed: f32 = value
        .parse()
        .map_err(|_| format!("expects a value between {min} and {max}"))?;
    if parsed.is_finite() && parsed >= min && parsed <= max {
        Ok(parsed)
    } else {
        Err(format!("expects a value between {min} and {max}"))
    }
}

fn parse_on_off(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" => Some(true),
        "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /clear                 Reset the conversation to the greeting
  /diagnostic on|off     Toggle diagnostic mode (alias: /test)
  /topk <n>              Documents to retrieve in diagnostic mode (1-10)
  /threshold <v>         Relevance threshold 0.0-1.0
  /docs                  Show documents retrieved for the last answer
  /expand <id>           Expand or collapse a retrieved document
  /stats                 Show session statistics
  /config                Show current configuration
  /help                  Show this help message
  /quit                  Exit the chat"#
}
