//! Diagnostic mode and the evidence panel.
//!
//! Diagnostic mode adds retrieval tuning parameters to every request and keeps
//! the documents the service cited for its latest answer. The evidence set is
//! display state only; it never feeds back into a request.

use crate::error::Result;
use crate::types::{RetrievedDocument, TuningParameters};

/// Mode flag, tuning parameters, and evidence for one session.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    enabled: bool,
    tuning: TuningParameters,
    evidence: Vec<RetrievedDocument>,
    expanded: Option<String>,
}

impl Diagnostics {
    /// Creates diagnostics with the given mode and tuning parameters.
    pub fn new(enabled: bool, tuning: TuningParameters) -> Self {
        Self {
            enabled,
            tuning,
            evidence: Vec::new(),
            expanded: None,
        }
    }

    /// Turns diagnostic mode on or off.
    ///
    /// Turning it off keeps the current evidence so it reappears when the mode
    /// is switched back on.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns true while diagnostic mode is on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The current tuning parameters.
    pub fn tuning(&self) -> TuningParameters {
        self.tuning
    }

    /// Replaces both tuning parameters.
    pub fn set_tuning(&mut self, tuning: TuningParameters) {
        self.tuning = tuning;
    }

    /// Sets the result count, leaving the parameters unchanged on error.
    pub fn set_result_count(&mut self, result_count: u32) -> Result<()> {
        self.tuning = self.tuning.with_result_count(result_count)?;
        Ok(())
    }

    /// Sets the relevance threshold, leaving the parameters unchanged on error.
    pub fn set_relevance_threshold(&mut self, relevance_threshold: f32) -> Result<()> {
        self.tuning = self.tuning.with_relevance_threshold(relevance_threshold)?;
        Ok(())
    }

    /// Parameters to attach to the next request, if any.
    pub fn request_tuning(&self) -> Option<TuningParameters> {
        self.enabled.then_some(self.tuning)
    }

    /// Documents backing the most recent diagnostic answer.
    pub fn evidence(&self) -> &[RetrievedDocument] {
        &self.evidence
    }

    /// Evidence worth showing: non-empty and diagnostic mode on.
    pub fn visible_evidence(&self) -> Option<&[RetrievedDocument]> {
        if self.enabled && !self.evidence.is_empty() {
            Some(&self.evidence)
        } else {
            None
        }
    }

    pub(crate) fn replace_evidence(&mut self, documents: Vec<RetrievedDocument>) {
        self.evidence = documents;
    }

    /// Expands `document_id`, or collapses it if it is already expanded.
    ///
    /// At most one document is expanded at a time. Returns true if the
    /// document is expanded afterwards.
    pub fn toggle_expansion(&mut self, document_id: &str) -> bool {
        if self.expanded.as_deref() == Some(document_id) {
            self.expanded = None;
            false
        } else {
            self.expanded = Some(document_id.to_string());
            true
        }
    }

    /// Identifier of the expanded document, if any.
    pub fn expanded_document_id(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    /// The expanded document, if it is part of the current evidence.
    pub fn expanded_document(&self) -> Option<&RetrievedDocument> {
        let id = self.expanded.as_deref()?;
        self.evidence.iter().find(|doc| doc.id == id)
    }

    /// Returns true if `document` meets the current relevance threshold.
    pub fn is_above_threshold(&self, document: &RetrievedDocument) -> bool {
        document.score >= self.tuning.relevance_threshold()
    }
}
