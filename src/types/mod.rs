// Public modules
pub mod chat_request;
pub mod chat_response;
pub mod message;
pub mod retrieved_document;
pub mod tuning_parameters;

// Re-exports
pub use chat_request::ChatRequest;
pub use chat_response::{ChatReply, DiagnosticResponse, NormalResponse};
pub use message::Message;
pub use retrieved_document::{DocumentMetadata, RetrievedDocument};
pub use tuning_parameters::{
    DEFAULT_RELEVANCE_THRESHOLD, DEFAULT_RESULT_COUNT, MAX_RESULT_COUNT, MIN_RESULT_COUNT,
    TuningParameters,
};
