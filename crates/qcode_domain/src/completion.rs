use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use thiserror::Error;

use crate::ModelId;

/// A single prompt addressed to a single model. Nothing is carried over
/// between requests.
#[derive(Clone, Debug, Deserialize, Serialize, Setters, PartialEq, Eq)]
#[setters(into)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model_id: ModelId,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, model_id: impl Into<ModelId>) -> Self {
        Self { prompt: prompt.into(), model_id: model_id.into() }
    }
}

/// Text returned by the model when the provider answers without any content.
pub const EMPTY_COMPLETION: &str = "No response";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompletionError {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("Request timeout - the model is taking too long to respond")]
    Timeout,

    #[error("Failed to send message: {0}")]
    RequestFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FailureKind {
    Unauthenticated,
    Timeout,
    RequestFailed,
    InvalidRequest,
}

impl CompletionError {
    pub fn missing_credential() -> Self {
        CompletionError::Unauthenticated("API key not set".to_string())
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            CompletionError::Unauthenticated(_) => FailureKind::Unauthenticated,
            CompletionError::Timeout => FailureKind::Timeout,
            CompletionError::RequestFailed(_) => FailureKind::RequestFailed,
            CompletionError::InvalidRequest(_) => FailureKind::InvalidRequest,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_missing_credential_is_unauthenticated() {
        let actual = CompletionError::missing_credential();
        assert_eq!(actual.kind(), FailureKind::Unauthenticated);
        assert_eq!(actual.to_string(), "API key not set");
    }

    #[test]
    fn test_request_failed_message() {
        let actual = CompletionError::RequestFailed("502 Bad Gateway".to_string());
        assert_eq!(actual.to_string(), "Failed to send message: 502 Bad Gateway");
    }

    #[test]
    fn test_request_setters() {
        let fixture = CompletionRequest::new("hi", "openai/gpt-4o").prompt("hello");
        assert_eq!(fixture.prompt, "hello");
        assert_eq!(fixture.model_id, ModelId::new("openai/gpt-4o"));
    }
}
