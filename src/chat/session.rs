//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the conversation
//! state and drives the request/response cycle against a [`ChatService`].
//!
//! A session is either idle or awaiting a response. [`ChatSession::submit`]
//! moves it from idle to awaiting by appending the user's message and
//! dispatching exactly one call; [`ChatSession::settle`] waits for that call
//! and appends exactly one bot message, so every accepted submit contributes a
//! user entry followed by a bot entry and nothing else.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::ChatService;
use crate::chat::config::ChatConfig;
use crate::chat::diagnostics::Diagnostics;
use crate::chat::log::{ConversationLog, LogObserver};
use crate::error::{Error, Result};
use crate::observability::{
    SESSION_LOG_RESETS, SESSION_SENTINEL_REPLIES, SESSION_SUBMITS, SESSION_SUBMITS_REJECTED,
};
use crate::types::{ChatReply, ChatRequest, Message, RetrievedDocument, TuningParameters};

/// Bot reply substituted for the answer whenever a call fails.
pub const SENTINEL_REPLY: &str = "Error sending message. Please try again.";

/// How an in-flight request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The service answered and its reply was appended.
    Answered,
    /// The call failed and the sentinel reply was appended.
    Failed,
}

struct InFlight {
    handle: JoinHandle<Result<ChatReply>>,
    diagnostic: bool,
}

/// A chat session that manages conversation state and service interactions.
pub struct ChatSession<S: ChatService + 'static> {
    service: Arc<S>,
    log: ConversationLog,
    input: String,
    in_flight: Option<InFlight>,
    diagnostics: Diagnostics,
    request_count: u64,
    failure_count: u64,
}

/// Snapshot of a chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    /// The number of entries in the conversation, including the greeting.
    pub message_count: usize,
    /// Whether a request is in flight.
    pub pending_request: bool,
    /// Whether diagnostic mode is on.
    pub diagnostic_mode: bool,
    /// The current tuning parameters.
    pub tuning: TuningParameters,
    /// The number of evidence documents held.
    pub evidence_count: usize,
    /// The expanded document, if any.
    pub expanded_document_id: Option<String>,
    /// Total number of requests dispatched.
    pub total_requests: u64,
    /// Number of requests that ended with the sentinel reply.
    pub failed_requests: u64,
}

impl<S: ChatService + 'static> ChatSession<S> {
    /// Creates a new chat session with default settings.
    pub fn new(service: S) -> Self {
        Self::with_config(service, &ChatConfig::default())
    }

    /// Creates a new chat session using the greeting and diagnostic settings of `config`.
    pub fn with_config(service: S, config: &ChatConfig) -> Self {
        Self {
            service: Arc::new(service),
            log: ConversationLog::with_greeting(config.greeting.clone()),
            input: String::new(),
            in_flight: None,
            diagnostics: Diagnostics::new(config.diagnostic_mode, config.tuning),
            request_count: 0,
            failure_count: 0,
        }
    }

    /// The service this session talks to.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Registers an observer for conversation log changes.
    pub fn subscribe(&mut self, observer: Box<dyn LogObserver>) {
        self.log.subscribe(observer);
    }

    /// The conversation so far.
    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.log.len()
    }

    /// Replaces the contents of the input buffer.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// The text waiting to be submitted.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns true between dispatching a request and settling it.
    pub fn pending_request(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Submits the input buffer.
    ///
    /// The submit is accepted only when no request is in flight and the input
    /// is not blank. An accepted submit appends the user's message verbatim,
    /// clears the input buffer, and dispatches one call carrying the tuning
    /// parameters if diagnostic mode is on. A rejected submit changes nothing.
    ///
    /// # Panics
    ///
    /// Panics if an accepted submit is called outside a tokio runtime.
    pub fn submit(&mut self) -> bool {
        if self.in_flight.is_some() || self.input.trim().is_empty() {
            SESSION_SUBMITS_REJECTED.click();
            return false;
        }
        SESSION_SUBMITS.click();

        let text = self.input.clone();
        self.log.append(Message::user(text.clone()));
        self.input.clear();

        let tuning = self.diagnostics.request_tuning();
        let service = Arc::clone(&self.service);
        let request = ChatRequest::new(text);
        let handle = tokio::spawn(async move { service.send(request, tuning).await });
        self.in_flight = Some(InFlight {
            handle,
            diagnostic: tuning.is_some(),
        });
        self.request_count += 1;
        true
    }

    /// Waits for the in-flight request and records its outcome.
    ///
    /// Returns `None` when nothing is in flight. If the returned future is
    /// dropped before completion, the request stays in flight and a later
    /// call picks it up.
    pub async fn settle(&mut self) -> Option<Settled> {
        let in_flight = self.in_flight.as_mut()?;
        let outcome = match (&mut in_flight.handle).await {
            Ok(result) => result,
            Err(err) => Err(Error::aborted(format!("request task ended: {err}"))),
        };
        let diagnostic = in_flight.diagnostic;
        self.in_flight = None;
        Some(self.apply(outcome, diagnostic))
    }

    /// Sets the input to `text`, submits it, and waits for the reply.
    ///
    /// Returns `None` if the submit was rejected.
    pub async fn send(&mut self, text: &str) -> Option<Settled> {
        if self.pending_request() {
            SESSION_SUBMITS_REJECTED.click();
            return None;
        }
        self.set_input(text);
        if !self.submit() {
            return None;
        }
        self.settle().await
    }

    fn apply(&mut self, outcome: Result<ChatReply>, diagnostic: bool) -> Settled {
        match outcome {
            Ok(reply) => {
                self.log.append(Message::bot(reply.answer));
                if diagnostic {
                    self.diagnostics
                        .replace_evidence(reply.documents.unwrap_or_default());
                }
                Settled::Answered
            }
            Err(_) => {
                SESSION_SENTINEL_REPLIES.click();
                self.failure_count += 1;
                self.log.append(Message::bot(SENTINEL_REPLY));
                Settled::Failed
            }
        }
    }

    /// Resets the conversation to the greeting.
    ///
    /// Evidence is left alone.
    pub fn clear(&mut self) {
        SESSION_LOG_RESETS.click();
        self.log.reset();
    }

    /// The mode, tuning, and evidence state.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Turns diagnostic mode on or off without touching the evidence.
    pub fn set_diagnostic_mode(&mut self, enabled: bool) {
        self.diagnostics.set_enabled(enabled);
    }

    /// Returns true while diagnostic mode is on.
    pub fn diagnostic_mode(&self) -> bool {
        self.diagnostics.is_enabled()
    }

    /// Replaces both tuning parameters.
    pub fn set_tuning_parameters(&mut self, tuning: TuningParameters) {
        self.diagnostics.set_tuning(tuning);
    }

    /// Returns the current tuning parameters.
    pub fn tuning_parameters(&self) -> TuningParameters {
        self.diagnostics.tuning()
    }

    /// Sets the number of documents to retrieve.
    pub fn set_result_count(&mut self, result_count: u32) -> Result<()> {
        self.diagnostics.set_result_count(result_count)
    }

    /// Sets the minimum relevance score.
    pub fn set_relevance_threshold(&mut self, relevance_threshold: f32) -> Result<()> {
        self.diagnostics.set_relevance_threshold(relevance_threshold)
    }

    /// Documents returned with the latest diagnostic answer.
    pub fn evidence(&self) -> &[RetrievedDocument] {
        self.diagnostics.evidence()
    }

    /// Expands or collapses one evidence document.
    pub fn toggle_expansion(&mut self, document_id: &str) -> bool {
        self.diagnostics.toggle_expansion(document_id)
    }

    /// Identifier of the expanded document, if any.
    pub fn expanded_document_id(&self) -> Option<&str> {
        self.diagnostics.expanded_document_id()
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            message_count: self.message_count(),
            pending_request: self.pending_request(),
            diagnostic_mode: self.diagnostic_mode(),
            tuning: self.tuning_parameters(),
            evidence_count: self.evidence().len(),
            expanded_document_id: self.expanded_document_id().map(String::from),
            total_requests: self.request_count,
            failed_requests: self.failure_count,
        }
    }
}
