use qcode_domain::{CompletionError, EMPTY_COMPLETION};
use serde::{Deserialize, Serialize};

use crate::error::ErrorResponse;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum Response {
    Failure {
        error: ErrorResponse,
    },
    Success {
        #[serde(default)]
        choices: Vec<Choice>,
    },
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl Response {
    /// The trimmed content of the first choice. A reply without content is
    /// still a reply.
    pub fn into_text(self) -> Result<String, CompletionError> {
        match self {
            Response::Failure { error } => {
                let message = error.to_string();
                match error.get_code_deep().and_then(|code| code.as_number()) {
                    Some(401) => Err(CompletionError::Unauthenticated(message)),
                    _ => Err(CompletionError::RequestFailed(message)),
                }
            }
            Response::Success { choices } => {
                let text = choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message)
                    .and_then(|message| message.content)
                    .map(|content| content.trim().to_string())
                    .filter(|content| !content.is_empty())
                    .unwrap_or_else(|| EMPTY_COMPLETION.to_string());
                Ok(text)
            }
        }
    }
}
