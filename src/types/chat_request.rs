use serde::{Deserialize, Serialize};

/// Body of a `POST` to the chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// The user's message, exactly as typed.
    pub message: String,
}

impl ChatRequest {
    /// Creates a request for the given message text.
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_message_field() {
        let json = serde_json::to_value(ChatRequest::new("Salut")).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Salut"}));
    }
}
