use std::path::Path;

use strum_macros::{Display, EnumIter, EnumString};

/// Language assumed when no source file is involved.
pub const DEFAULT_LANGUAGE: &str = "javascript";

/// Programming topics offered for examples and practice exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Topic {
    Variables,
    Functions,
    Loops,
    Conditionals,
    Arrays,
    Objects,
    Strings,
    Numbers,
    ErrorHandling,
    FileOperations,
}

impl Topic {
    /// Points the examples should cover, most specific first.
    fn outline(&self) -> &'static [&'static str] {
        match self {
            Topic::Variables => &[
                "Simple explanation of what variables are",
                "Different ways to declare variables",
                "Variable naming conventions",
                "Common mistakes and how to avoid them",
                "Practice exercises with solutions",
            ],
            Topic::Functions => &[
                "What functions are and why to use them",
                "Function syntax and structure",
                "Parameters and return values",
                "Different function types",
                "Practice exercises with solutions",
            ],
            Topic::Loops => &[
                "What loops are and when to use them",
                "Different loop types (for, while, etc.)",
                "Loop control statements (break, continue)",
                "Nested loops",
                "Practice exercises with solutions",
            ],
            Topic::Conditionals => &[
                "What conditionals are and why to use them",
                "If-else statements",
                "Switch statements",
                "Comparison and logical operators",
                "Practice exercises with solutions",
            ],
            _ => &[
                "Simple explanation",
                "Basic example with comments",
                "Common variations",
                "Best practices",
                "Things to avoid",
            ],
        }
    }

    fn style(&self) -> &'static str {
        match self {
            Topic::Functions => "Build complexity gradually",
            Topic::Loops => "Show real-world use cases",
            Topic::Conditionals => "Cover common decision-making scenarios",
            _ => "Suitable for absolute beginners",
        }
    }
}

/// Builders for the canned prompts behind the editor-style actions. Every
/// prompt is a plain string and goes through the dispatcher like any other
/// user message.
pub struct PromptTemplate;

impl PromptTemplate {
    pub fn explain_code(language: &str, file_name: &str, code: &str) -> String {
        format!(
            "Please explain the following {language} code from {file_name} in simple terms for beginners:\n\n\
             ```{language}\n{code}\n```\n\n\
             Please provide:\n{}",
            numbered(&[
                "What this code does (in simple terms)",
                "Key concepts used",
                "Step-by-step breakdown",
                "Common mistakes to avoid",
                "Best practices",
            ])
        )
    }

    pub fn find_bugs(language: &str, file_name: &str, code: &str) -> String {
        format!(
            "Check the following {language} code from {file_name} for potential bugs and issues:\n\n\
             ```{language}\n{code}\n```\n\n\
             Please provide:\n{}",
            numbered(&[
                "Potential bugs found",
                "Explanation in simple terms",
                "How to fix each issue",
                "Prevention tips for future",
            ])
        )
    }

    pub fn detect_errors(language: &str, code: &str) -> String {
        format!(
            "Analyze the following {language} code for common errors and provide fixes:\n\n\
             ```{language}\n{code}\n```\n\n\
             Please provide:\n{}",
            numbered(&[
                "List of potential errors found",
                "Explanation in simple terms (for beginners)",
                "How to fix each error",
                "Prevention tips",
                "Best practices to avoid similar errors",
            ])
        )
    }

    pub fn explain_error(message: &str) -> String {
        format!(
            "Explain this error message in simple terms for a beginner programmer:\n\n\
             Error: \"{message}\"\n\n\
             Please provide:\n{}",
            numbered(&[
                "What this error means (simple explanation)",
                "Common causes",
                "How to fix it",
                "Example of correct code",
                "Prevention tips",
            ])
        )
    }

    pub fn examples(topic: Topic, language: &str) -> String {
        format!(
            "Generate beginner-friendly examples for {topic} in {language}:\n\n\
             Please provide:\n{}\n\n\
             Examples should be:\n- Well-commented\n- Include expected output\n- {}",
            numbered(topic.outline()),
            topic.style()
        )
    }

    pub fn practice(topic: Topic, language: &str) -> String {
        format!(
            "Generate 5 practice exercises for {topic} in {language}:\n\n\
             For each exercise, provide:\n{}\n\n\
             Exercises should be:\n- Progressive difficulty\n- Well-suited for beginners\n\
             - Include real-world scenarios\n- Have clear success criteria",
            numbered(&[
                "Problem statement (clear and simple)",
                "Sample input/output",
                "Hints for solving",
                "Complete solution with comments",
                "Explanation of the solution",
            ])
        )
    }
}

fn numbered(items: &[&str]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Maps a source file to the language name used in prompts and code fences.
pub fn language_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("rs") => "rust",
        Some("py") => "python",
        Some("js" | "mjs" | "cjs") => "javascript",
        Some("jsx") => "javascriptreact",
        Some("ts") => "typescript",
        Some("tsx") => "typescriptreact",
        Some("java") => "java",
        Some("go") => "go",
        Some("c" | "h") => "c",
        Some("cpp" | "cc" | "cxx" | "hpp") => "cpp",
        Some("cs") => "csharp",
        Some("rb") => "ruby",
        Some("php") => "php",
        Some("kt" | "kts") => "kotlin",
        Some("swift") => "swift",
        Some("scala") => "scala",
        Some("sh" | "bash") => "shellscript",
        Some("html" | "htm") => "html",
        Some("css") => "css",
        Some("json") => "json",
        Some("sql") => "sql",
        _ => "plaintext",
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_topic_parses_kebab_case() {
        assert_eq!(Topic::from_str("error-handling").unwrap(), Topic::ErrorHandling);
        assert_eq!(Topic::FileOperations.to_string(), "file-operations");
        assert!(Topic::from_str("monads").is_err());
        assert_eq!(Topic::iter().count(), 10);
    }

    #[test]
    fn test_explain_code_embeds_fenced_source() {
        let actual = PromptTemplate::explain_code("rust", "main.rs", "fn main() {}");

        assert!(actual.starts_with("Please explain the following rust code from main.rs"));
        assert!(actual.contains("```rust\nfn main() {}\n```"));
        assert!(actual.ends_with("5. Best practices"));
    }

    #[test]
    fn test_explain_error_quotes_message() {
        let actual = PromptTemplate::explain_error("undefined is not a function");
        assert!(actual.contains("Error: \"undefined is not a function\""));
        assert!(actual.contains("4. Example of correct code"));
    }

    #[test]
    fn test_examples_use_topic_outline() {
        let actual = PromptTemplate::examples(Topic::Loops, "python");

        assert!(actual.starts_with("Generate beginner-friendly examples for loops in python:"));
        assert!(actual.contains("3. Loop control statements (break, continue)"));
        assert!(actual.ends_with("- Show real-world use cases"));
    }

    #[test]
    fn test_examples_generic_outline() {
        let actual = PromptTemplate::examples(Topic::Arrays, "go");
        assert!(actual.contains("5. Things to avoid"));
    }

    #[test]
    fn test_practice_mentions_five_exercises() {
        let actual = PromptTemplate::practice(Topic::Strings, DEFAULT_LANGUAGE);
        assert!(actual.starts_with("Generate 5 practice exercises for strings in javascript:"));
    }

    #[test]
    fn test_language_for_path() {
        assert_eq!(language_for_path(&PathBuf::from("src/lib.rs")), "rust");
        assert_eq!(language_for_path(&PathBuf::from("App.TSX")), "typescriptreact");
        assert_eq!(language_for_path(&PathBuf::from("Makefile")), "plaintext");
    }
}
