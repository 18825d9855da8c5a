use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_EVIDENCE_DOCUMENTS, CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS,
};
use crate::types::{ChatReply, ChatRequest, DiagnosticResponse, NormalResponse, TuningParameters};

/// Endpoint of a chat service running on the local machine.
pub const DEFAULT_CHAT_URL: &str = "http://localhost:8080/api/v2/chat";

/// The remote chat service as seen by a session.
///
/// A call settles exactly once, with either a decoded reply or an error. The
/// session treats every error the same way, so implementations need not
/// classify failures beyond what is useful for logging.
#[async_trait::async_trait]
pub trait ChatService: Send + Sync {
    /// Sends one message.
    ///
    /// `tuning` is `Some` exactly when the session is in diagnostic mode; the
    /// service then answers with evidence documents alongside the reply.
    async fn send(
        &self,
        request: ChatRequest,
        tuning: Option<TuningParameters>,
    ) -> Result<ChatReply>;
}

/// HTTP client for a retrieval-augmented chat service.
#[derive(Clone)]
pub struct HttpChatClient {
    client: ReqwestClient,
    url: Url,
    timeout: Option<Duration>,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl HttpChatClient {
    /// Create a client for the service at `url`.
    ///
    /// No request timeout is set: a call that never settles leaves the
    /// session waiting.
    pub fn new(url: &str) -> Result<Self> {
        Self::with_options(url, None)
    }

    /// Create a client with an optional per-request timeout.
    pub fn with_options(url: &str, timeout: Option<Duration>) -> Result<Self> {
        let url = Url::parse(url)?;
        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;
        Ok(Self {
            client,
            url,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that observes every request, reply, and failure.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The base endpoint, without query parameters.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Builds the address for one call.
    ///
    /// Normal mode posts to the bare endpoint. Diagnostic mode appends `topK`
    /// and `similarityThreshold`.
    pub fn request_url(&self, tuning: Option<&TuningParameters>) -> Url {
        let mut url = self.url.clone();
        if let Some(tuning) = tuning {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in tuning.query_pairs() {
                pairs.append_pair(key, &value);
            }
        }
        url
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    async fn post(&self, url: Url, request: &ChatRequest) -> Result<Response> {
        let response = self
            .client
            .post(url)
            .headers(Self::default_headers())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {}", e),
                        self.timeout.map(|t| t.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }
        Ok(response)
    }

    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();
        match response.text().await {
            Ok(body) => Error::api(status_code, body),
            Err(e) => Error::api(status_code, format!("failed to read error response: {e}")),
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response.bytes().await.map_err(|e| {
            Error::http_client(
                format!("Failed to read response: {}", e),
                Some(Box::new(e)),
            )
        })?;
        serde_json::from_slice(&body).map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    async fn send_inner(
        &self,
        request: &ChatRequest,
        tuning: Option<&TuningParameters>,
    ) -> Result<ChatReply> {
        let url = self.request_url(tuning);
        if let Some(logger) = &self.logger {
            logger.log_request(url.as_str(), request);
        }
        let response = self.post(url, request).await?;
        if tuning.is_some() {
            let decoded: DiagnosticResponse = Self::decode(response).await?;
            Ok(decoded.into())
        } else {
            let decoded: NormalResponse = Self::decode(response).await?;
            Ok(decoded.into())
        }
    }
}

impl std::fmt::Debug for HttpChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpChatClient")
            .field("url", &self.url.as_str())
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

#[async_trait::async_trait]
impl ChatService for HttpChatClient {
    async fn send(
        &self,
        request: ChatRequest,
        tuning: Option<TuningParameters>,
    ) -> Result<ChatReply> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = self.send_inner(&request, tuning.as_ref()).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        match &result {
            Ok(reply) => {
                if let Some(documents) = &reply.documents {
                    CLIENT_EVIDENCE_DOCUMENTS.count(documents.len() as u64);
                }
                if let Some(logger) = &self.logger {
                    logger.log_reply(reply);
                }
            }
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                if let Some(logger) = &self.logger {
                    logger.log_failure(err);
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpChatClient::new(DEFAULT_CHAT_URL).unwrap();
        assert_eq!(client.url().as_str(), DEFAULT_CHAT_URL);
        assert!(HttpChatClient::new("not a url").is_err());
    }

    #[test]
    fn normal_mode_url_has_no_query() {
        let client = HttpChatClient::new(DEFAULT_CHAT_URL).unwrap();
        let url = client.request_url(None);
        assert_eq!(url.as_str(), "http://localhost:8080/api/v2/chat");
        assert!(url.query().is_none());
    }

    #[test]
    fn diagnostic_mode_url_carries_tuning() {
        let client = HttpChatClient::new(DEFAULT_CHAT_URL).unwrap();
        let tuning = TuningParameters::new(3, 0.5).unwrap();
        let url = client.request_url(Some(&tuning));
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/v2/chat?topK=3&similarityThreshold=0.5"
        );
        // The base endpoint is untouched.
        assert!(client.url().query().is_none());
    }
}
