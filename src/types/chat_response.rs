use serde::{Deserialize, Serialize};

use super::RetrievedDocument;

/// Response body returned by the service in normal mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalResponse {
    /// The bot's answer.
    pub message: String,
}

/// Response body returned by the service in diagnostic mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticResponse {
    /// The bot's answer.
    pub response: String,

    /// Evidence backing the answer; absent when retrieval found nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<RetrievedDocument>>,
}

/// The mode-independent result of a successful chat call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    /// The bot's answer text.
    pub answer: String,

    /// Evidence documents, present only for diagnostic requests that returned any.
    pub documents: Option<Vec<RetrievedDocument>>,
}

impl ChatReply {
    /// Creates a reply carrying only an answer.
    pub fn text<S: Into<String>>(answer: S) -> Self {
        Self {
            answer: answer.into(),
            documents: None,
        }
    }

    /// Attaches evidence documents.
    pub fn with_documents(mut self, documents: Vec<RetrievedDocument>) -> Self {
        self.documents = Some(documents);
        self
    }
}

impl From<NormalResponse> for ChatReply {
    fn from(response: NormalResponse) -> Self {
        Self {
            answer: response.message,
            documents: None,
        }
    }
}

impl From<DiagnosticResponse> for ChatReply {
    fn from(response: DiagnosticResponse) -> Self {
        Self {
            answer: response.response,
            documents: response.documents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_response_requires_message() {
        let reply: NormalResponse =
            serde_json::from_value(serde_json::json!({"message": "Buna ziua!"})).unwrap();
        assert_eq!(ChatReply::from(reply), ChatReply::text("Buna ziua!"));
        assert!(
            serde_json::from_value::<NormalResponse>(serde_json::json!({"response": "x"}))
                .is_err()
        );
    }

    #[test]
    fn diagnostic_response_documents_optional() {
        let reply: DiagnosticResponse =
            serde_json::from_value(serde_json::json!({"response": "Răspuns"})).unwrap();
        let reply = ChatReply::from(reply);
        assert_eq!(reply.answer, "Răspuns");
        assert!(reply.documents.is_none());
    }

    #[test]
    fn diagnostic_response_with_documents() {
        let reply: DiagnosticResponse = serde_json::from_value(serde_json::json!({
            "response": "Răspuns",
            "documents": [
                {"id": "d1", "text": "...", "score": 0.8,
                 "metadata": {"source": "doc.pdf", "distance": 0.12}}
            ]
        }))
        .unwrap();
        let reply = ChatReply::from(reply);
        let documents = reply.documents.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, "d1");
    }
}
