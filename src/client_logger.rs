//! Logging trait for chat client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! and log all service interactions passing through the
//! [`HttpChatClient`](crate::HttpChatClient). Failures are reported here and
//! nowhere else; the conversation only ever shows the sentinel reply.

use crate::{ChatReply, ChatRequest, Error};

/// A trait for logging chat client operations.
///
/// Implement this trait to capture and record all service interactions.
///
/// # Example
///
/// ```rust,ignore
/// use ragchat::{ChatReply, ChatRequest, ClientLogger, Error};
/// use std::io::Write;
/// use std::sync::Mutex;
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_request(&self, url: &str, request: &ChatRequest) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "POST {url}: {}", request.message).unwrap();
///     }
///
///     fn log_reply(&self, reply: &ChatReply) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Reply: {}", reply.answer).unwrap();
///     }
///
///     fn log_failure(&self, error: &Error) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Failure: {error}").unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log an outbound request and the fully-qualified URL it is sent to.
    fn log_request(&self, url: &str, request: &ChatRequest);

    /// Log a successfully decoded reply.
    fn log_reply(&self, reply: &ChatReply);

    /// Log a failed call.
    fn log_failure(&self, error: &Error);
}

/// Writes one line per client event to standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrLogger;

impl ClientLogger for StderrLogger {
    fn log_request(&self, url: &str, request: &ChatRequest) {
        eprintln!("[ragchat] POST {url} ({} bytes)", request.message.len());
    }

    fn log_reply(&self, reply: &ChatReply) {
        match &reply.documents {
            Some(documents) => eprintln!(
                "[ragchat] reply: {} chars, {} documents",
                reply.answer.chars().count(),
                documents.len()
            ),
            None => eprintln!("[ragchat] reply: {} chars", reply.answer.chars().count()),
        }
    }

    fn log_failure(&self, error: &Error) {
        eprintln!("[ragchat] Error sending message: {error}");
    }
}
