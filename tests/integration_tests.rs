//! Integration tests for the ragchat client.
//!
//! Most tests run the real HTTP client against a one-shot responder on a local
//! port. The live test requires RAGCHAT_URL in the environment to run.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use ragchat::chat::{ChatSession, SENTINEL_REPLY, Settled};
    use ragchat::{
        ChatReply, ChatRequest, ChatService, ClientLogger, Error, HttpChatClient, Message,
        TuningParameters,
    };

    /// What the responder saw.
    struct Captured {
        request_line: String,
        headers: String,
        body: String,
    }

    /// Accepts one connection, records the request, and answers with `status` and `body`.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api/v2/chat", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let header_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before headers were complete");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let head = String::from_utf8(buf[..header_end].to_vec()).unwrap();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().unwrap())
                })
                .unwrap_or(0);
            while buf.len() < header_end + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before body was complete");
                buf.extend_from_slice(&chunk[..n]);
            }
            let body_in =
                String::from_utf8(buf[header_end..header_end + content_length].to_vec()).unwrap();

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            let mut lines = head.lines();
            let request_line = lines.next().unwrap_or_default().to_string();
            Captured {
                request_line,
                headers: head.to_lowercase(),
                body: body_in,
            }
        });
        (url, handle)
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<String>>,
    }

    impl ClientLogger for RecordingLogger {
        fn log_request(&self, url: &str, request: &ChatRequest) {
            self.events
                .lock()
                .unwrap()
                .push(format!("request {url} {}", request.message));
        }

        fn log_reply(&self, reply: &ChatReply) {
            self.events
                .lock()
                .unwrap()
                .push(format!("reply {}", reply.answer));
        }

        fn log_failure(&self, error: &Error) {
            self.events
                .lock()
                .unwrap()
                .push(format!("failure {:?}", error.status_code()));
        }
    }

    #[tokio::test]
    async fn normal_mode_posts_json_without_query() {
        let (url, server) = serve_once("200 OK", r#"{"message":"Buna ziua!"}"#).await;
        let client = HttpChatClient::new(&url).unwrap();

        let reply = client
            .send(ChatRequest::new("Salut"), None)
            .await
            .unwrap();
        assert_eq!(reply, ChatReply::text("Buna ziua!"));

        let captured = server.await.unwrap();
        assert_eq!(captured.request_line, "POST /api/v2/chat HTTP/1.1");
        assert!(captured.headers.contains("content-type: application/json"));
        let body: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
        assert_eq!(body, serde_json::json!({"message": "Salut"}));
    }

    #[tokio::test]
    async fn diagnostic_mode_sends_tuning_and_reads_documents() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"response":"Răspuns","documents":[{"id":"d1","text":"...","score":0.8,"metadata":{"source":"doc.pdf","distance":0.12}}]}"#,
        )
        .await;
        let client = HttpChatClient::new(&url).unwrap();
        let tuning = TuningParameters::new(3, 0.5).unwrap();

        let reply = client
            .send(ChatRequest::new("test"), Some(tuning))
            .await
            .unwrap();
        assert_eq!(reply.answer, "Răspuns");
        let documents = reply.documents.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].metadata.source, "doc.pdf");

        let captured = server.await.unwrap();
        assert_eq!(
            captured.request_line,
            "POST /api/v2/chat?topK=3&similarityThreshold=0.5 HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (url, server) = serve_once("503 Service Unavailable", r#"{"error":"busy"}"#).await;
        let logger = Arc::new(RecordingLogger::default());
        let client = HttpChatClient::new(&url)
            .unwrap()
            .with_logger(logger.clone());

        let err = client
            .send(ChatRequest::new("Salut"), None)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert!(err.is_retryable());
        server.await.unwrap();

        let events = logger.events.lock().unwrap().clone();
        assert_eq!(events.len(), 2);
        assert!(events[0].starts_with("request http://127.0.0.1:"));
        assert_eq!(events[1], "failure Some(503)");
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let (url, server) =
            serve_once("200 OK", r#"{"response":"wrong field for normal mode"}"#).await;
        let client = HttpChatClient::new(&url).unwrap();
        let err = client
            .send(ChatRequest::new("Salut"), None)
            .await
            .unwrap_err();
        assert!(err.is_serialization());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn connection_refused_is_an_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpChatClient::new(&format!("http://{addr}/api/v2/chat")).unwrap();
        let err = client
            .send(ChatRequest::new("Salut"), None)
            .await
            .unwrap_err();
        assert!(err.is_connection() || matches!(err, Error::HttpClient { .. }));
    }

    #[tokio::test]
    async fn session_over_http_round_trip() {
        let (url, server) = serve_once("200 OK", r#"{"message":"Buna ziua!"}"#).await;
        let mut session = ChatSession::new(HttpChatClient::new(&url).unwrap());

        assert_eq!(session.send("Salut").await, Some(Settled::Answered));
        assert_eq!(session.message_count(), 3);
        assert_eq!(session.log().get(1), Some(&Message::user("Salut")));
        assert_eq!(session.log().last(), &Message::bot("Buna ziua!"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn session_over_http_failure_uses_sentinel() {
        let (url, server) = serve_once("500 Internal Server Error", "oops").await;
        let mut session = ChatSession::new(HttpChatClient::new(&url).unwrap());

        assert_eq!(session.send("Salut").await, Some(Settled::Failed));
        assert_eq!(session.log().last(), &Message::bot(SENTINEL_REPLY));
        assert!(!session.pending_request());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_live_service() {
        // This test requires RAGCHAT_URL to point at a running service
        let url = std::env::var("RAGCHAT_URL").ok();
        let Some(url) = url else {
            eprintln!("Skipping test: RAGCHAT_URL not set");
            return;
        };

        let client = HttpChatClient::new(&url).expect("Failed to create client");
        let mut session = ChatSession::new(client);
        let settled = session.send("Salut").await;
        assert_eq!(settled, Some(Settled::Answered), "service should answer");
        assert_eq!(session.message_count(), 3);
    }
}
