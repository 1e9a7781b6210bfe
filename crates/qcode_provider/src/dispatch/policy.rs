use qcode_domain::{ModelId, Temperature};
use strum_macros::Display;

use crate::matcher::IdMatch;

const CODING: IdMatch = IdMatch::Contains(&["coder", "code"]);
const QWEN: IdMatch = IdMatch::Contains(&["qwen"]);

const CODING_TEMPERATURE: Temperature = Temperature::new_unchecked(0.6);
const DEFAULT_TEMPERATURE: Temperature = Temperature::new_unchecked(0.7);
const QWEN_MAX_TOKENS: u32 = 2000;
const DEFAULT_MAX_TOKENS: u32 = 1500;

/// The system prompt personality a request is sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Persona {
    Coding,
    Qwen,
    Generic,
}

impl Persona {
    /// First matching row wins; anything unmatched gets the generic persona.
    const TABLE: &'static [(IdMatch, Persona)] = &[(CODING, Persona::Coding), (QWEN, Persona::Qwen)];

    pub fn for_model(model: &ModelId) -> Self {
        Self::TABLE
            .iter()
            .find(|(matcher, _)| matcher.matches(model.as_str()))
            .map(|(_, persona)| *persona)
            .unwrap_or(Persona::Generic)
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            Persona::Coding => {
                "You are an expert coding assistant specializing in multiple programming languages. \
                 Provide clear, well-explained code examples with comments. Focus on best practices, \
                 efficiency, and readability. When showing code, use proper syntax with triple \
                 backticks and specify the language."
            }
            Persona::Qwen => {
                "You are Qwen, a large-scale language model developed by Tongyi Lab. You are a \
                 helpful coding assistant. Provide clear, concise answers with code examples when \
                 appropriate. When showing code, use proper syntax with triple backticks and \
                 specify the language."
            }
            Persona::Generic => {
                "You are a helpful coding assistant. Provide clear, concise answers with code \
                 examples when appropriate. When showing code, use proper syntax with triple \
                 backticks and specify the language."
            }
        }
    }
}

/// Sampling parameters and persona chosen for one model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestPolicy {
    pub persona: Persona,
    pub temperature: Temperature,
    pub max_tokens: u32,
}

impl RequestPolicy {
    pub fn for_model(model: &ModelId) -> Self {
        let id = model.as_str();
        let temperature = if CODING.matches(id) { CODING_TEMPERATURE } else { DEFAULT_TEMPERATURE };
        let max_tokens = if QWEN.matches(id) { QWEN_MAX_TOKENS } else { DEFAULT_MAX_TOKENS };

        Self { persona: Persona::for_model(model), temperature, max_tokens }
    }
}
