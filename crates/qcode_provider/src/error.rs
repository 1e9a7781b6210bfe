use std::collections::BTreeMap;

use derive_setters::Setters;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ErrorCode {
    String(String),
    Number(u16),
}

impl ErrorCode {
    pub fn as_number(&self) -> Option<u16> {
        match self {
            ErrorCode::String(s) => s.parse::<u16>().ok(),
            ErrorCode::Number(code) => Some(*code),
        }
    }
}

/// Error envelope returned by OpenRouter, either as the body of a non-2xx
/// response or inside an otherwise successful one.
#[derive(Default, Debug, Deserialize, Serialize, Clone, Setters)]
#[setters(strip_option, into)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Box<ErrorResponse>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ErrorResponse {
    /// Deeply introspects the error structure to determine the ErrorCode
    pub fn get_code_deep(&self) -> Option<&ErrorCode> {
        if let Some(ref code) = self.code {
            return Some(code);
        }
        if let Some(ref error) = self.error {
            return error.get_code_deep();
        }
        None
    }

    /// The innermost human readable message.
    pub fn get_message_deep(&self) -> Option<&str> {
        if let Some(message) = self.error.as_ref().and_then(|e| e.get_message_deep()) {
            return Some(message);
        }
        self.message.as_deref()
    }

    /// Extracts the provider's message from a raw response body, falling back
    /// to the body itself when it is not an error envelope.
    pub fn reason(body: &str) -> String {
        let body = body.trim();
        if body.is_empty() {
            return "[Unknown]".to_string();
        }
        serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|response| response.get_message_deep().map(str::to_string))
            .unwrap_or_else(|| body.to_string())
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.get_message_deep() {
            Some(message) => write!(f, "{message}"),
            None => serde_json::to_string(self)
                .map_err(|_| std::fmt::Error)?
                .fmt(f),
        }
    }
}
