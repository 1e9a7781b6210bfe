use std::fmt;

use colored::Colorize;
use qcode_domain::{Environment, ModelId};

use crate::command::Command;

#[derive(Debug, Clone, PartialEq)]
enum Section {
    Title(String),
    Item { key: String, value: String },
}

/// Titled key/value blocks for status and help output.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Info {
    sections: Vec<Section>,
}

impl Info {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_title(mut self, title: impl ToString) -> Self {
        self.sections.push(Section::Title(title.to_string()));
        self
    }

    pub fn add_item(mut self, key: impl ToString, value: impl ToString) -> Self {
        self.sections
            .push(Section::Item { key: key.to_string(), value: value.to_string() });
        self
    }

    pub fn help() -> Self {
        Command::available_commands().iter().fold(
            Self::new().add_title("Commands"),
            |info, (command, description)| info.add_item(command, description),
        )
    }

    pub fn environment(env: &Environment, model: &ModelId) -> Self {
        Self::new()
            .add_title("Session")
            .add_item("Model", model)
            .add_item("Provider", &env.provider_url)
            .add_item("Logs", env.log_path().display())
            .add_item("Working Directory", env.cwd.display())
    }
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .sections
            .iter()
            .filter_map(|section| match section {
                Section::Item { key, .. } => Some(key.chars().count()),
                Section::Title(_) => None,
            })
            .max()
            .unwrap_or_default();

        for section in &self.sections {
            match section {
                Section::Title(title) => writeln!(f, "\n{}", title.bold().dimmed())?,
                Section::Item { key, value } => {
                    let key = format!("{key:<width$}");
                    writeln!(f, "  {} {}", key.bright_yellow().bold(), value)?
                }
            }
        }
        Ok(())
    }
}
