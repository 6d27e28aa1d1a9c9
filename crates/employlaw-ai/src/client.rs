//! HTTP client for the event-dispatch generation backend.

use async_trait::async_trait;
use employlaw_core::{GenerateRequest, Generator};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Client for the backend's `/api/events` endpoint.
///
/// No timeout is configured: a call that never returns leaves the caller
/// waiting.
pub struct EventClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct EventResponse {
    #[serde(default)]
    result: Option<String>,
}

impl EventClient {
    /// Create a client for the given backend base URL.
    ///
    /// `base_url` should be like `http://localhost:4000` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Send `Authorization: Bearer <key>` with every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Dispatch one generation event and return its result text, if any.
    pub async fn create_event(
        &self,
        request: &GenerateRequest,
    ) -> Result<Option<String>, GenerateError> {
        let url = format!("{}/api/events", self.base_url);

        info!(url = %url, event = %request.event_name, "dispatching generation event");
        let mut builder = self.client.post(&url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerateError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let parsed: EventResponse = serde_json::from_str(&body)?;
        info!(
            has_result = parsed.result.is_some(),
            "generation event settled"
        );
        Ok(parsed.result)
    }
}

#[async_trait]
impl Generator for EventClient {
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<Option<String>> {
        Ok(self.create_event(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn redundancy_request() -> GenerateRequest {
        GenerateRequest::for_query("Am I entitled to redundancy pay?")
    }

    #[tokio::test]
    async fn posts_event_and_returns_result() {
        let server = MockServer::start().await;
        let req = redundancy_request();
        Mock::given(method("POST"))
            .and(path("/api/events"))
            .and(body_json(json!({
                "event_name": "chatgpt_request",
                "params": {
                    "prompt": req.params.prompt,
                    "response_type": "text"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "Yes, under the Employment Rights Act 1996..."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = EventClient::new(server.uri());
        let result = client.create_event(&req).await.unwrap();
        assert_eq!(
            result.as_deref(),
            Some("Yes, under the Employment Rights Act 1996...")
        );
    }

    #[tokio::test]
    async fn null_or_missing_result_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = EventClient::new(server.uri());
        assert!(client.create_event(&redundancy_request()).await.unwrap().is_none());
        assert!(client.create_event(&redundancy_request()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn server_error_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let client = EventClient::new(server.uri());
        match client.create_event(&redundancy_request()).await {
            Err(GenerateError::Server { status, body }) => {
                assert_eq!(status, 502);
                assert_eq!(body, "upstream unavailable");
            }
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = EventClient::new(server.uri());
        let err = client.create_event(&redundancy_request()).await.unwrap_err();
        assert!(matches!(err, GenerateError::Json(_)));
    }

    #[tokio::test]
    async fn api_key_sent_as_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer secret-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "ok" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = EventClient::new(server.uri()).with_api_key("secret-key");
        let result = client.create_event(&redundancy_request()).await.unwrap();
        assert_eq!(result.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn generator_impl_surfaces_errors_through_anyhow() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = EventClient::new(server.uri());
        let err = client.generate(&redundancy_request()).await.unwrap_err();
        assert!(err.to_string().contains("server returned 500"));
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = EventClient::new("http://localhost:4000/".into());
        assert_eq!(client.base_url, "http://localhost:4000");
    }
}
