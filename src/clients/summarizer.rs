//! Client for the external summarizer service.
//!
//! `enrich` never returns an error: every transport, status and decoding
//! problem is folded into [`EnrichmentOutcome::Failure`] so callers can apply
//! their fallback without matching on reqwest internals.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const REACHABILITY_TIMEOUT: Duration = Duration::from_secs(5);

/// Body sent to `POST /summarize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichmentRequest {
    pub content: String,
    pub url: String,
}

impl EnrichmentRequest {
    pub fn new(content: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            url: url.into(),
        }
    }
}

/// Title, summary and tags produced by the summarizer.
///
/// Absent fields decode as empty; blank values are backfilled downstream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Enrichment {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentFailure {
    /// Connection refused, DNS failure, timeout, or the body stream broke off.
    Unreachable,
    /// The summarizer answered with anything but `200 OK`.
    ServiceError(u16),
    /// The body was not a valid summary document.
    Decode,
}

impl EnrichmentFailure {
    /// Low-cardinality label for metrics.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            EnrichmentFailure::Unreachable => "unreachable",
            EnrichmentFailure::ServiceError(_) => "service_error",
            EnrichmentFailure::Decode => "decode",
        }
    }

    #[must_use]
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EnrichmentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrichmentFailure::Unreachable => f.write_str("unreachable"),
            EnrichmentFailure::ServiceError(code) => write!(f, "service error: {code}"),
            EnrichmentFailure::Decode => f.write_str("decode error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    Success(Enrichment),
    Failure(EnrichmentFailure),
}

impl EnrichmentOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, EnrichmentOutcome::Success(_))
    }
}

#[derive(Debug, Clone)]
pub struct SummarizerClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl SummarizerClient {
    /// Builds a client for the summarizer rooted at `base_url`.
    ///
    /// `timeout` bounds each `enrich` call end to end, body included.
    ///
    /// # Errors
    /// Returns an error when the URL does not parse or the HTTP client cannot
    /// be constructed.
    pub fn new(
        base_url: impl Into<String>,
        connect_timeout: Duration,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
            .context("failed to build summarizer client")?;

        let mut base = base_url.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).context("invalid summarizer base URL")?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Checks that the summarizer host answers HTTP at all.
    ///
    /// The service only exposes `POST /summarize`, so any response to a `GET`
    /// on the base URL, 404 and 405 included, counts as reachable.
    ///
    /// # Errors
    /// Returns an error when no HTTP response arrives within five seconds.
    pub async fn check_reachable(&self) -> Result<()> {
        let response = self
            .client
            .get(self.base_url.clone())
            .timeout(REACHABILITY_TIMEOUT)
            .send()
            .await
            .context("summarizer did not answer")?;

        debug!(status = response.status().as_u16(), "summarizer reachable");
        Ok(())
    }

    /// Asks the summarizer for a title, summary and tags.
    ///
    /// Empty strings or an empty tag list in a well-formed response are passed
    /// through untouched.
    pub async fn enrich(&self, request: &EnrichmentRequest) -> EnrichmentOutcome {
        let url = match self.base_url.join("summarize") {
            Ok(url) => url,
            Err(error) => {
                warn!(%error, "failed to build summarizer URL");
                return EnrichmentOutcome::Failure(EnrichmentFailure::Unreachable);
            }
        };

        debug!(
            %url,
            content_len = request.content.len(),
            source_url = %request.url,
            "sending enrichment request to summarizer"
        );

        let response = match self.client.post(url).json(request).send().await {
            Ok(response) => response,
            Err(error) => {
                warn!(
                    error = %error,
                    timeout = error.is_timeout(),
                    connect = error.is_connect(),
                    "summarizer unreachable"
                );
                return EnrichmentOutcome::Failure(EnrichmentFailure::Unreachable);
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                body = %truncate(&body, 256),
                "summarizer returned error status"
            );
            return EnrichmentOutcome::Failure(EnrichmentFailure::ServiceError(status.as_u16()));
        }

        // Read the body first so a stalled stream counts as unreachable, not decode.
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(error = %error, "summarizer response body could not be read");
                return EnrichmentOutcome::Failure(EnrichmentFailure::Unreachable);
            }
        };

        match serde_json::from_slice::<Enrichment>(&bytes) {
            Ok(enrichment) => {
                debug!(
                    title = %enrichment.title,
                    tag_count = enrichment.tags.len(),
                    "summarizer enrichment received"
                );
                EnrichmentOutcome::Success(enrichment)
            }
            Err(error) => {
                warn!(error = %error, "failed to decode summarizer response");
                EnrichmentOutcome::Failure(EnrichmentFailure::Decode)
            }
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(uri: impl Into<String>, timeout: Duration) -> SummarizerClient {
        SummarizerClient::new(uri, Duration::from_millis(500), timeout).expect("client builds")
    }

    #[tokio::test]
    async fn enrich_parses_successful_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/summarize"))
            .and(body_json(serde_json::json!({
                "content": "raw text",
                "url": "https://example.com/post"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "title": "Async Rust",
                "summary": "A tour of futures.",
                "tags": ["rust", "async"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(server.uri(), Duration::from_secs(5));
        let outcome = client
            .enrich(&EnrichmentRequest::new("raw text", "https://example.com/post"))
            .await;

        assert_eq!(
            outcome,
            EnrichmentOutcome::Success(Enrichment {
                title: "Async Rust".to_string(),
                summary: "A tour of futures.".to_string(),
                tags: vec!["rust".to_string(), "async".to_string()],
            })
        );
    }

    #[tokio::test]
    async fn enrich_passes_through_empty_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/summarize"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "title": "",
                "summary": "",
                "tags": []
            })))
            .mount(&server)
            .await;

        let client = client_for(server.uri(), Duration::from_secs(5));
        let outcome = client.enrich(&EnrichmentRequest::new("", "u")).await;

        match outcome {
            EnrichmentOutcome::Success(enrichment) => {
                assert!(enrichment.title.is_empty());
                assert!(enrichment.summary.is_empty());
                assert!(enrichment.tags.is_empty());
            }
            EnrichmentOutcome::Failure(failure) => panic!("unexpected failure: {failure}"),
        }
    }

    #[tokio::test]
    async fn enrich_classifies_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/summarize"))
            .respond_with(ResponseTemplate::new(400).set_body_string("cannot scrape url"))
            .mount(&server)
            .await;

        let client = client_for(server.uri(), Duration::from_secs(5));
        let outcome = client.enrich(&EnrichmentRequest::new("", "u")).await;

        assert_eq!(
            outcome,
            EnrichmentOutcome::Failure(EnrichmentFailure::ServiceError(400))
        );
        if let EnrichmentOutcome::Failure(failure) = outcome {
            assert_eq!(failure.reason(), "service error: 400");
        }
    }

    #[tokio::test]
    async fn enrich_classifies_garbage_body_as_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/summarize"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(server.uri(), Duration::from_secs(5));
        let outcome = client.enrich(&EnrichmentRequest::new("c", "u")).await;

        assert_eq!(outcome, EnrichmentOutcome::Failure(EnrichmentFailure::Decode));
    }

    #[tokio::test]
    async fn enrich_accepts_body_with_missing_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/summarize"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"summary": "S", "tags": ["x"]})),
            )
            .mount(&server)
            .await;

        let client = client_for(server.uri(), Duration::from_secs(5));
        let outcome = client.enrich(&EnrichmentRequest::new("c", "u")).await;

        assert_eq!(
            outcome,
            EnrichmentOutcome::Success(Enrichment {
                title: String::new(),
                summary: "S".to_string(),
                tags: vec!["x".to_string()],
            })
        );
    }

    #[tokio::test]
    async fn enrich_treats_non_200_success_status_as_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/summarize"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "title": "t",
                "summary": "s",
                "tags": ["a"]
            })))
            .mount(&server)
            .await;

        let client = client_for(server.uri(), Duration::from_secs(5));
        let outcome = client.enrich(&EnrichmentRequest::new("c", "u")).await;

        assert_eq!(
            outcome,
            EnrichmentOutcome::Failure(EnrichmentFailure::ServiceError(201))
        );
    }

    #[tokio::test]
    async fn enrich_classifies_timeout_as_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/summarize"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "title": "late",
                        "summary": "late",
                        "tags": []
                    }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = client_for(server.uri(), Duration::from_millis(200));
        let outcome = client.enrich(&EnrichmentRequest::new("c", "u")).await;

        assert_eq!(
            outcome,
            EnrichmentOutcome::Failure(EnrichmentFailure::Unreachable)
        );
    }

    #[tokio::test]
    async fn enrich_classifies_refused_connection_as_unreachable() {
        let uri = {
            let server = MockServer::start().await;
            server.uri()
        };
        let client = client_for(uri, Duration::from_secs(2));
        let outcome = client.enrich(&EnrichmentRequest::new("c", "u")).await;

        assert_eq!(
            outcome,
            EnrichmentOutcome::Failure(EnrichmentFailure::Unreachable)
        );
    }

    #[tokio::test]
    async fn reachability_accepts_any_http_response() {
        // Nothing is mounted, so the mock answers 404 like a summarizer without GET routes.
        let server = MockServer::start().await;

        let client = client_for(server.uri(), Duration::from_secs(5));
        client.check_reachable().await.expect("404 still means reachable");
    }

    #[tokio::test]
    async fn reachability_fails_when_nothing_listens() {
        let uri = {
            let server = MockServer::start().await;
            server.uri()
        };

        let client = client_for(uri, Duration::from_secs(2));
        let error = client.check_reachable().await.expect_err("should fail");
        assert!(error.to_string().contains("did not answer"));
    }

    #[test]
    fn failure_reasons_match_wire_literals() {
        assert_eq!(EnrichmentFailure::Unreachable.reason(), "unreachable");
        assert_eq!(EnrichmentFailure::ServiceError(502).reason(), "service error: 502");
        assert_eq!(EnrichmentFailure::Decode.reason(), "decode error");
    }

    #[test]
    fn base_url_without_trailing_slash_keeps_its_path() {
        let client = client_for("http://summarizer:8000/api", Duration::from_secs(1));
        assert_eq!(
            client.base_url.join("summarize").expect("joins").as_str(),
            "http://summarizer:8000/api/summarize"
        );
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }
}
