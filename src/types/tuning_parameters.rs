use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Smallest accepted result count.
pub const MIN_RESULT_COUNT: u32 = 1;

/// Largest accepted result count.
pub const MAX_RESULT_COUNT: u32 = 10;

/// Default number of documents requested in diagnostic mode.
pub const DEFAULT_RESULT_COUNT: u32 = 3;

/// Default relevance threshold in diagnostic mode.
pub const DEFAULT_RELEVANCE_THRESHOLD: f32 = 0.5;

/// Retrieval parameters sent with each request while diagnostic mode is on.
///
/// A value of this type is always within range: both constructors and the
/// deserializer validate their input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawTuningParameters")]
pub struct TuningParameters {
    result_count: u32,
    relevance_threshold: f32,
}

impl TuningParameters {
    /// Creates validated tuning parameters.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `result_count` is outside
    /// `MIN_RESULT_COUNT..=MAX_RESULT_COUNT` or `relevance_threshold` is not a
    /// finite value in `[0, 1]`.
    pub fn new(result_count: u32, relevance_threshold: f32) -> Result<Self> {
        validate_result_count(result_count)?;
        validate_relevance_threshold(relevance_threshold)?;
        Ok(Self {
            result_count,
            relevance_threshold,
        })
    }

    /// Returns the number of documents to retrieve.
    pub fn result_count(&self) -> u32 {
        self.result_count
    }

    /// Returns the minimum relevance score.
    pub fn relevance_threshold(&self) -> f32 {
        self.relevance_threshold
    }

    /// Returns a copy with a different result count.
    pub fn with_result_count(self, result_count: u32) -> Result<Self> {
        Self::new(result_count, self.relevance_threshold)
    }

    /// Returns a copy with a different relevance threshold.
    pub fn with_relevance_threshold(self, relevance_threshold: f32) -> Result<Self> {
        Self::new(self.result_count, relevance_threshold)
    }

    /// Query parameters understood by the chat service.
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("topK", self.result_count.to_string()),
            ("similarityThreshold", self.relevance_threshold.to_string()),
        ]
    }
}

impl Default for TuningParameters {
    fn default() -> Self {
        Self {
            result_count: DEFAULT_RESULT_COUNT,
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
        }
    }
}

#[derive(Deserialize)]
struct RawTuningParameters {
    result_count: u32,
    relevance_threshold: f32,
}

impl TryFrom<RawTuningParameters> for TuningParameters {
    type Error = Error;

    fn try_from(raw: RawTuningParameters) -> Result<Self> {
        Self::new(raw.result_count, raw.relevance_threshold)
    }
}

fn validate_result_count(result_count: u32) -> Result<()> {
    if (MIN_RESULT_COUNT..=MAX_RESULT_COUNT).contains(&result_count) {
        Ok(())
    } else {
        Err(Error::validation(
            format!(
                "result count must be between {MIN_RESULT_COUNT} and {MAX_RESULT_COUNT}, got {result_count}"
            ),
            Some("topK".to_string()),
        ))
    }
}

fn validate_relevance_threshold(relevance_threshold: f32) -> Result<()> {
    if relevance_threshold.is_finite() && (0.0..=1.0).contains(&relevance_threshold) {
        Ok(())
    } else {
        Err(Error::validation(
            format!("relevance threshold must be between 0 and 1, got {relevance_threshold}"),
            Some("similarityThreshold".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = TuningParameters::default();
        assert_eq!(params.result_count(), 3);
        assert_eq!(params.relevance_threshold(), 0.5);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(TuningParameters::new(0, 0.5).unwrap_err().is_validation());
        assert!(TuningParameters::new(11, 0.5).is_err());
        assert!(TuningParameters::new(3, 1.5).is_err());
        assert!(TuningParameters::new(3, -0.1).is_err());
        assert!(TuningParameters::new(3, f32::NAN).is_err());
        assert!(TuningParameters::new(10, 1.0).is_ok());
        assert!(TuningParameters::new(1, 0.0).is_ok());
    }

    #[test]
    fn query_pairs_use_service_names() {
        let params = TuningParameters::new(3, 0.5).unwrap();
        let pairs = params.query_pairs();
        assert_eq!(pairs[0], ("topK", "3".to_string()));
        assert_eq!(pairs[1], ("similarityThreshold", "0.5".to_string()));
    }

    #[test]
    fn deserialize_validates() {
        let ok: TuningParameters =
            serde_yaml::from_str("result_count: 5\nrelevance_threshold: 0.25\n").unwrap();
        assert_eq!(ok.result_count(), 5);
        assert!(
            serde_yaml::from_str::<TuningParameters>("result_count: 0\nrelevance_threshold: 0.25\n")
                .is_err()
        );
    }
}
