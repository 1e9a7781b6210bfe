use std::path::PathBuf;
use std::str::FromStr;

use qcode_domain::{ModelId, Topic};
use strum::IntoEnumIterator;

use crate::error::{Error, Result};

/// One line of user input, either a slash command or a chat message.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Sent to the current model as is.
    Message(String),
    /// Reload the catalog and list it.
    Models,
    /// Switch model, interactively when no id is given.
    Model(Option<ModelId>),
    /// Prompt for a new API key.
    Key,
    Explain(PathBuf),
    Bugs(PathBuf),
    Errors(PathBuf),
    /// Explain an error message.
    Why(String),
    Examples(Option<Topic>),
    Practice(Option<Topic>),
    Help,
    Exit,
}

impl Command {
    /// Slash commands with a short description, in the order shown by
    /// `/help`.
    pub fn available_commands() -> &'static [(&'static str, &'static str)] {
        &[
            ("/models", "Reload and list the free models"),
            ("/model [id]", "Switch the model used for new messages"),
            ("/key", "Set the OpenRouter API key"),
            ("/explain <file>", "Explain a source file for beginners"),
            ("/bugs <file>", "Look for bugs in a source file"),
            ("/errors <file>", "Detect common errors in a source file"),
            ("/why <error>", "Explain an error message"),
            ("/examples [topic]", "Generate beginner examples for a topic"),
            ("/practice [topic]", "Generate practice exercises for a topic"),
            ("/help", "Show this list"),
            ("/exit", "Quit"),
        ]
    }

    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let (head, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (trimmed, ""),
        };

        match head {
            "/models" => Ok(Command::Models),
            "/model" => Ok(Command::Model(
                Some(rest).filter(|id| !id.is_empty()).map(ModelId::new),
            )),
            "/key" => Ok(Command::Key),
            "/explain" => Ok(Command::Explain(path(rest)?)),
            "/bugs" => Ok(Command::Bugs(path(rest)?)),
            "/errors" => Ok(Command::Errors(path(rest)?)),
            "/why" if rest.is_empty() => Err(Error::MissingParameter("error message".into())),
            "/why" => Ok(Command::Why(rest.to_string())),
            "/examples" => Ok(Command::Examples(topic(rest)?)),
            "/practice" => Ok(Command::Practice(topic(rest)?)),
            "/help" => Ok(Command::Help),
            "/exit" => Ok(Command::Exit),
            _ => Ok(Command::Message(trimmed.to_string())),
        }
    }
}

fn path(arg: &str) -> Result<PathBuf> {
    if arg.is_empty() {
        return Err(Error::MissingParameter("file".into()));
    }
    Ok(PathBuf::from(arg))
}

fn topic(arg: &str) -> Result<Option<Topic>> {
    if arg.is_empty() {
        return Ok(None);
    }
    Topic::from_str(&arg.to_lowercase().replace([' ', '_'], "-"))
        .map(Some)
        .map_err(|_| {
            let topics = Topic::iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ");
            Error::UnsupportedParameter(format!("{arg} (expected one of: {topics})"))
        })
}
