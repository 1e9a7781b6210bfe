use std::time::Duration;

use anyhow::Context as _;
use derive_builder::Builder;
use qcode_domain::{CatalogError, CompletionError};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::model::{ListModelResponse, OpenRouterModel};
use super::request::ChatRequest;
use super::response::Response;
use crate::error::ErrorResponse;
use crate::utils::format_http_context;

const REFERER: &str = "https://qcode.dev";
const TITLE: &str = "QCode Chat";
const AGENT: &str = "QCode-Chat/1.0";

/// Thin client for the two OpenRouter endpoints this application uses. Each
/// call is a single attempt bounded by the timeout it is given.
#[derive(Clone, Builder)]
pub struct OpenRouter {
    client: Client,
    base_url: Url,
}

impl OpenRouter {
    pub fn builder() -> OpenRouterBuilder {
        OpenRouterBuilder::default()
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        if path.contains("://") || path.contains("..") {
            anyhow::bail!("Invalid path: Contains forbidden patterns");
        }

        let path = path.trim_start_matches('/');

        self.base_url
            .join(path)
            .with_context(|| format!("Failed to append {} to base URL: {}", path, self.base_url))
    }

    fn headers(api_key: &str) -> Result<HeaderMap, CompletionError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| {
                CompletionError::Unauthenticated("API key contains invalid characters".to_string())
            })?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("HTTP-Referer", HeaderValue::from_static(REFERER));
        headers.insert("X-Title", HeaderValue::from_static(TITLE));
        Ok(headers)
    }

    /// Fetches the raw model listing.
    pub async fn models(&self, timeout: Duration) -> Result<Vec<OpenRouterModel>, CatalogError> {
        let url = self
            .url("models")
            .map_err(|error| CatalogError::Http { status: None, message: format!("{error:#}") })?;
        debug!(url = %url, "Fetching models");

        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, AGENT)
            .timeout(timeout)
            .send()
            .await
            .map_err(|error| catalog_transport_error(error, &url))?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = %status, url = %url, "Model listing rejected");
            return Err(CatalogError::Http {
                status: Some(status.as_u16()),
                message: format!(
                    "{} - {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|error| catalog_transport_error(error, &url))?;

        let listing: ListModelResponse = serde_json::from_str(&body).map_err(|error| {
            CatalogError::Malformed(format!(
                "{}: {error}",
                format_http_context(Some(status), "GET", &url)
            ))
        })?;

        Ok(listing.into_models())
    }

    /// Sends one chat completion request and decodes the provider's answer.
    pub async fn chat(
        &self,
        api_key: &str,
        request: &ChatRequest,
        timeout: Duration,
    ) -> Result<Response, CompletionError> {
        let url = self
            .url("chat/completions")
            .map_err(|error| CompletionError::RequestFailed(format!("{error:#}")))?;

        debug!(
            url = %url,
            model = %request.model,
            message_count = request.messages.len(),
            "Connecting Upstream"
        );

        let response = self
            .client
            .post(url.clone())
            .headers(Self::headers(api_key)?)
            .timeout(timeout)
            .json(request)
            .send()
            .await
            .map_err(|error| completion_transport_error(error, &url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| completion_transport_error(error, &url))?;

        if !status.is_success() {
            let reason = ErrorResponse::reason(&body);
            debug!(status = %status, reason = %reason, "Completion rejected");
            return Err(match status {
                StatusCode::UNAUTHORIZED => CompletionError::Unauthenticated(reason),
                _ => CompletionError::RequestFailed(format!("{status} Reason: {reason}")),
            });
        }

        serde_json::from_str::<Response>(&body).map_err(|error| {
            CompletionError::RequestFailed(format!(
                "{}: failed to parse response: {error}",
                format_http_context(Some(status), "POST", &url)
            ))
        })
    }
}

fn catalog_transport_error(error: reqwest::Error, url: &Url) -> CatalogError {
    if error.is_timeout() {
        debug!(url = %url, "Model listing timed out");
        return CatalogError::Timeout;
    }
    CatalogError::Http {
        status: error.status().map(|status| status.as_u16()),
        message: format!("{}: {error}", format_http_context(error.status(), "GET", url)),
    }
}

fn completion_transport_error(error: reqwest::Error, url: &Url) -> CompletionError {
    if error.is_timeout() {
        debug!(url = %url, "Completion timed out");
        return CompletionError::Timeout;
    }
    CompletionError::RequestFailed(format!(
        "{}: {error}",
        format_http_context(error.status(), "POST", url)
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use qcode_domain::{FailureKind, ModelId};

    use super::*;
    use crate::open_router::Message;

    fn fixture(base: &str) -> OpenRouter {
        OpenRouter::builder()
            .client(Client::new())
            .base_url(Url::parse(base).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_url_joins_relative_to_api_root() {
        let provider = fixture("https://openrouter.ai/api/v1/");
        assert_eq!(
            provider.url("/chat/completions").unwrap().as_str(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert!(provider.url("../admin").is_err());
        assert!(provider.url("https://evil.example/models").is_err());
    }

    #[tokio::test]
    async fn test_models_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/models")
            .match_header("user-agent", AGENT)
            .with_status(503)
            .create_async()
            .await;

        let provider = fixture(&format!("{}/", server.url()));
        let actual = provider.models(Duration::from_secs(5)).await.unwrap_err();

        assert_eq!(
            actual,
            CatalogError::Http {
                status: Some(503),
                message: "503 - Service Unavailable".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_models_connection_refused() {
        let address = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();

        let provider = fixture(&format!("http://{address}/"));
        let actual = provider.models(Duration::from_secs(5)).await.unwrap_err();

        match actual {
            CatalogError::Http { status, message } => {
                assert_eq!(status, None);
                assert!(message.starts_with(&format!("GET http://{address}/models: ")));
            }
            other => panic!("expected a connection error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_models_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/models")
            .with_status(200)
            .with_body(r#"{"object": "list"}"#)
            .create_async()
            .await;

        let provider = fixture(&format!("{}/", server.url()));
        let actual = provider.models(Duration::from_secs(5)).await.unwrap_err();

        assert!(matches!(actual, CatalogError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_chat_sends_identifying_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-or-test")
            .match_header("http-referer", REFERER)
            .match_header("x-title", TITLE)
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
            .create_async()
            .await;

        let provider = fixture(&format!("{}/", server.url()));
        let request = ChatRequest::new(ModelId::new("openai/gpt-4o"), vec![Message::user("hi")]);
        let actual = provider
            .chat("sk-or-test", &request, Duration::from_secs(5))
            .await
            .unwrap()
            .into_text()
            .unwrap();

        mock.assert_async().await;
        assert_eq!(actual, "ok");
    }

    #[tokio::test]
    async fn test_chat_unparseable_success_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let provider = fixture(&format!("{}/", server.url()));
        let request = ChatRequest::new(ModelId::new("openai/gpt-4o"), vec![Message::user("hi")]);
        let actual = provider
            .chat("sk-or-test", &request, Duration::from_secs(5))
            .await
            .unwrap_err();

        assert_eq!(actual.kind(), FailureKind::RequestFailed);
    }
}
