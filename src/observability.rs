use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("ragchat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("ragchat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("ragchat.client.request_duration_seconds");
pub(crate) static CLIENT_EVIDENCE_DOCUMENTS: Counter =
    Counter::new("ragchat.client.evidence_documents");

pub(crate) static SESSION_SUBMITS: Counter = Counter::new("ragchat.session.submits");
pub(crate) static SESSION_SUBMITS_REJECTED: Counter =
    Counter::new("ragchat.session.submits_rejected");
pub(crate) static SESSION_SENTINEL_REPLIES: Counter =
    Counter::new("ragchat.session.sentinel_replies");
pub(crate) static SESSION_LOG_RESETS: Counter = Counter::new("ragchat.session.log_resets");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);
    collector.register_counter(&CLIENT_EVIDENCE_DOCUMENTS);

    collector.register_counter(&SESSION_SUBMITS);
    collector.register_counter(&SESSION_SUBMITS_REJECTED);
    collector.register_counter(&SESSION_SENTINEL_REPLIES);
    collector.register_counter(&SESSION_LOG_RESETS);
}
