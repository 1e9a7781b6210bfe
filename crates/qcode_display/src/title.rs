use std::fmt::{self, Display, Formatter};

use colored::Colorize;
use convert_case::{Case, Casing};
use derive_setters::Setters;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Action,
    Info,
    Success,
    Error,
}

/// A one-line status headline printed between chat messages.
#[derive(Clone, Setters)]
#[setters(into, strip_option)]
pub struct TitleFormat {
    pub title: String,
    pub sub_title: Option<String>,
    pub category: Category,
}

impl TitleFormat {
    pub fn action(title: impl Into<String>) -> Self {
        Self::new(title, Category::Action)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(title, Category::Info)
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(title, Category::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Category::Error)
    }

    fn new(title: impl Into<String>, category: Category) -> Self {
        Self { title: title.into(), sub_title: None, category }
    }

    pub fn format(&self) -> String {
        let mut buf = String::new();

        let icon = match self.category {
            Category::Action => "⏺".blue(),
            Category::Info => "⏺".white(),
            Category::Success => "⏺".green(),
            Category::Error => "⏺".red(),
        };
        buf.push_str(&format!("{icon} "));

        // Error titles are messages and keep their own casing.
        let title = match self.category {
            Category::Error => self.title.red().bold(),
            Category::Success => self.title.to_case(Case::Title).green().bold(),
            _ => self.title.to_case(Case::Title).white().bold(),
        };
        buf.push_str(&title.to_string());

        if let Some(ref sub_title) = self.sub_title {
            buf.push_str(&format!(" {}", sub_title.dimmed()));
        }

        buf
    }
}

impl Display for TitleFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn plain(title: &TitleFormat) -> String {
        strip_ansi_escapes::strip_str(title.format())
    }

    #[test]
    fn test_action_title_is_title_cased() {
        let fixture = TitleFormat::action("loading models");
        assert_eq!(plain(&fixture), "⏺ Loading Models");
    }

    #[test]
    fn test_sub_title_follows_title() {
        let fixture = TitleFormat::success("model selected").sub_title("qwen/qwen3-coder:free");
        assert_eq!(plain(&fixture), "⏺ Model Selected qwen/qwen3-coder:free");
    }

    #[test]
    fn test_error_keeps_message_casing() {
        let fixture = TitleFormat::error("Error: API key not set");
        assert_eq!(plain(&fixture), "⏺ Error: API key not set");
    }
}
