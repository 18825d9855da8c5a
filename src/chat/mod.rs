//! Chat application module for interactive conversations with a chat service.
//!
//! This module provides the conversational session controller and a REPL
//! front-end built on top of it. It supports:
//!
//! - An append-only conversation log with change notifications
//! - One request in flight at a time, with a fixed reply on failure
//! - A diagnostic mode that sends retrieval parameters and shows evidence
//! - Slash commands for session control
//!
//! # Architecture
//!
//! - [`log`]: the conversation log and its observers
//! - [`session`]: the request orchestrator
//! - [`diagnostics`]: diagnostic mode, tuning parameters, and evidence
//! - [`config`]: CLI argument parsing and configuration
//! - [`commands`]: slash command parsing
//! - [`render`]: terminal output

mod commands;
mod config;
mod diagnostics;
mod log;
mod render;
mod session;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, ConfigFile};
pub use diagnostics::Diagnostics;
pub use log::{ConversationLog, DEFAULT_GREETING, LogObserver};
pub use render::{FOOTER_NOTICE, PlainTextRenderer, Renderer, describe_mode};
pub use session::{ChatSession, SENTINEL_REPLY, SessionStats, Settled};
