use colored::Colorize;
use qcode_domain::{ModelDescriptor, ModelId};

/// Numbered listing of catalog models, marking the one in use.
pub struct ModelListFormat<'a> {
    models: &'a [ModelDescriptor],
    current: Option<&'a ModelId>,
}

impl<'a> ModelListFormat<'a> {
    pub fn new(models: &'a [ModelDescriptor]) -> Self {
        Self { models, current: None }
    }

    pub fn current(mut self, current: &'a ModelId) -> Self {
        self.current = Some(current);
        self
    }

    pub fn format(&self) -> String {
        let width = self
            .models
            .iter()
            .map(|model| model.display_name.chars().count())
            .max()
            .unwrap_or_default();

        self.models
            .iter()
            .enumerate()
            .map(|(i, model)| {
                let selected = self.current == Some(&model.id);
                let marker = if selected { "*".green().bold() } else { " ".normal() };
                let name = format!("{:<width$}", model.display_name);
                let name = if selected { name.green().bold() } else { name.normal() };
                let mut line = format!("{marker} {:>2}. {name}  {}", i + 1, model.id.as_str().dimmed());
                if let Some(context) = model.context_length {
                    line.push_str(&format!(" {}", format!("{}k ctx", context / 1000).dimmed()));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_marks_current_model() {
        let models = vec![
            ModelDescriptor::new("qwen/qwen3-coder:free", "Qwen3 Coder (free)").context_length(262144_u64),
            ModelDescriptor::new("google/gemma-3-27b-it:free", "Gemma 3 (free)"),
        ];
        let current = ModelId::new("google/gemma-3-27b-it:free");

        let actual = strip_ansi_escapes::strip_str(ModelListFormat::new(&models).current(&current).format());
        let expected = [
            "   1. Qwen3 Coder (free)  qwen/qwen3-coder:free 262k ctx",
            "*  2. Gemma 3 (free)      google/gemma-3-27b-it:free",
        ]
        .join("\n");

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(ModelListFormat::new(&[]).format(), "");
    }
}
