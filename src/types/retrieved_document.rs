use serde::{Deserialize, Serialize};

/// Provenance details attached to a retrieved document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentMetadata {
    /// The file or collection the passage was taken from.
    pub source: String,

    /// Vector distance between the query and the passage.
    pub distance: f32,
}

/// A ranked source passage returned alongside an answer in diagnostic mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedDocument {
    /// Identifier, unique within one response.
    pub id: String,

    /// Full passage text.
    pub text: String,

    /// Relevance score in `[0, 1]`.
    pub score: f32,

    /// Where the passage came from.
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl RetrievedDocument {
    /// Number of characters shown in a collapsed preview.
    pub const PREVIEW_CHARS: usize = 50;

    /// Returns the first [`Self::PREVIEW_CHARS`] characters of the passage.
    ///
    /// Truncation happens on character boundaries, so multi-byte text is never split.
    pub fn preview(&self) -> &str {
        match self.text.char_indices().nth(Self::PREVIEW_CHARS) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_document() {
        let json = serde_json::json!({
            "id": "d1",
            "text": "Regulamentul de admitere",
            "score": 0.8,
            "metadata": {"source": "doc.pdf", "distance": 0.12}
        });
        let doc: RetrievedDocument = serde_json::from_value(json).unwrap();
        assert_eq!(doc.id, "d1");
        assert_eq!(doc.metadata.source, "doc.pdf");
        assert!((doc.metadata.distance - 0.12).abs() < f32::EPSILON);
    }

    #[test]
    fn missing_metadata_defaults() {
        let json = serde_json::json!({"id": "d2", "text": "x", "score": 0.1});
        let doc: RetrievedDocument = serde_json::from_value(json).unwrap();
        assert_eq!(doc.metadata, DocumentMetadata::default());
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let doc = RetrievedDocument {
            id: "d1".to_string(),
            text: "ă".repeat(60),
            score: 0.5,
            metadata: DocumentMetadata::default(),
        };
        assert_eq!(doc.preview().chars().count(), 50);

        let short = RetrievedDocument {
            text: "scurt".to_string(),
            ..doc
        };
        assert_eq!(short.preview(), "scurt");
    }
}
