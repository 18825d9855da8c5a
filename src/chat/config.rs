//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg`, an optional YAML
//! configuration file, and the resolved [`ChatConfig`]. Command-line flags
//! take precedence over file values, which take precedence over defaults.

use std::path::Path;
use std::time::Duration;

use arrrg_derive::CommandLine;
use serde::{Deserialize, Serialize};

use crate::DEFAULT_CHAT_URL;
use crate::chat::log::DEFAULT_GREETING;
use crate::error::{Error, Result};
use crate::types::TuningParameters;

/// Command-line arguments for the ragchat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Chat service endpoint.
    #[arrrg(optional, "Chat endpoint (default: http://localhost:8080/api/v2/chat)", "URL")]
    pub url: Option<String>,

    /// YAML file with configuration values.
    #[arrrg(optional, "YAML configuration file", "FILE")]
    pub config: Option<String>,

    /// Start with diagnostic mode enabled.
    #[arrrg(flag, "Start in diagnostic mode (show retrieved documents)")]
    pub diagnostic: bool,

    /// Number of documents to retrieve in diagnostic mode.
    #[arrrg(optional, "Documents to retrieve in diagnostic mode, 1-10 (default: 3)", "N")]
    pub top_k: Option<u32>,

    /// Relevance threshold in diagnostic mode.
    #[arrrg(optional, "Relevance threshold 0.0-1.0 (default: 0.5)", "SCORE")]
    pub threshold: Option<String>,

    /// Per-request timeout; unset means wait indefinitely.
    #[arrrg(optional, "Request timeout in seconds (default: none)", "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Log every request, reply, and failure to stderr.
    #[arrrg(flag, "Log requests and failures to stderr")]
    pub verbose: bool,
}

/// Values accepted in a YAML configuration file.
///
/// Every field is optional; missing fields keep their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Chat service endpoint.
    pub url: Option<String>,
    /// Greeting shown at the top of the conversation.
    pub greeting: Option<String>,
    /// Start in diagnostic mode.
    pub diagnostic: Option<bool>,
    /// Number of documents to retrieve.
    pub top_k: Option<u32>,
    /// Relevance threshold.
    pub threshold: Option<f32>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Whether to use ANSI colors.
    pub color: Option<bool>,
}

/// Configuration for a chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Chat service endpoint, without query parameters.
    pub url: String,

    /// Greeting that opens (and reopens, after a clear) the conversation.
    pub greeting: String,

    /// Whether diagnostic mode starts enabled.
    pub diagnostic_mode: bool,

    /// Retrieval parameters used in diagnostic mode.
    pub tuning: TuningParameters,

    /// Optional per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether to log client activity to stderr.
    pub verbose: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - URL: http://localhost:8080/api/v2/chat
    /// - Diagnostic mode: off, top-k 3, threshold 0.5
    /// - Timeout: none
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            url: DEFAULT_CHAT_URL.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            diagnostic_mode: false,
            tuning: TuningParameters::default(),
            timeout: None,
            use_color: true,
            verbose: false,
        }
    }

    /// Sets the service URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the greeting.
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Sets whether diagnostic mode starts enabled.
    pub fn with_diagnostic_mode(mut self, enabled: bool) -> Self {
        self.diagnostic_mode = enabled;
        self
    }

    /// Sets the tuning parameters.
    pub fn with_tuning(mut self, tuning: TuningParameters) -> Self {
        self.tuning = tuning;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Enables client logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Loads a YAML configuration file on top of the defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|err| {
            Error::io(
                format!("failed to read config file {}", path.as_ref().display()),
                err,
            )
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parses YAML configuration on top of the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        Self::new().apply_file(file)
    }

    /// Resolves command-line arguments, reading `--config` first if given.
    pub fn from_args(args: ChatArgs) -> Result<Self> {
        let base = match args.config.as_deref() {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::new(),
        };
        base.apply_args(args)
    }

    fn apply_file(mut self, file: ConfigFile) -> Result<Self> {
        if let Some(url) = file.url {
            self.url = url;
        }
        if let Some(greeting) = file.greeting {
            self.greeting = greeting;
        }
        if let Some(diagnostic) = file.diagnostic {
            self.diagnostic_mode = diagnostic;
        }
        if let Some(top_k) = file.top_k {
            self.tuning = self.tuning.with_result_count(top_k)?;
        }
        if let Some(threshold) = file.threshold {
            self.tuning = self.tuning.with_relevance_threshold(threshold)?;
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(color) = file.color {
            self.use_color = color;
        }
        Ok(self)
    }

    fn apply_args(mut self, args: ChatArgs) -> Result<Self> {
        if let Some(url) = args.url {
            self.url = url;
        }
        if args.diagnostic {
            self.diagnostic_mode = true;
        }
        if let Some(top_k) = args.top_k {
            self.tuning = self.tuning.with_result_count(top_k)?;
        }
        if let Some(threshold) = args.threshold.as_deref() {
            self.tuning = self
                .tuning
                .with_relevance_threshold(parse_threshold(threshold)?)?;
        }
        if let Some(secs) = args.timeout_secs {
            self.timeout = Some(Duration::from_secs(secs));
        }
        if args.no_color {
            self.use_color = false;
        }
        if args.verbose {
            self.verbose = true;
        }
        Ok(self)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<ChatArgs> for ChatConfig {
    type Error = Error;

    fn try_from(args: ChatArgs) -> Result<Self> {
        Self::from_args(args)
    }
}

fn parse_threshold(value: &str) -> Result<f32> {
    value.trim().parse::<f32>().map_err(|_| {
        Error::validation(
            format!("threshold must be a number, got {value:?}"),
            Some("threshold".to_string()),
        )
    })
}
