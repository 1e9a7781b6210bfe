use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "qcode", version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chat with free OpenRouter models about your code")]
pub struct Cli {
    /// Direct prompt to process without entering interactive mode.
    #[arg(long, short = 'p')]
    pub prompt: Option<String>,

    /// Model to use instead of the configured default.
    #[arg(long, short = 'm')]
    pub model: Option<String>,

    /// Enable verbose logging.
    #[arg(long, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<TopLevelCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum TopLevelCommand {
    /// Print the ranked list of free models.
    Models,

    /// Store the OpenRouter API key.
    SetKey {
        /// The key, usually starting with `sk-or-`.
        key: String,
    },

    /// Send a single prompt and print the reply.
    Ask {
        /// The prompt to send.
        prompt: String,
    },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_prompt_and_model_flags() {
        let actual = Cli::try_parse_from(["qcode", "-p", "what is a closure?", "-m", "vendor/x-coder:free"]).unwrap();

        assert_eq!(actual.prompt.as_deref(), Some("what is a closure?"));
        assert_eq!(actual.model.as_deref(), Some("vendor/x-coder:free"));
        assert_eq!(actual.command, None);
    }

    #[test]
    fn test_set_key_subcommand() {
        let actual = Cli::try_parse_from(["qcode", "set-key", "sk-or-v1-abc"]).unwrap();
        assert_eq!(
            actual.command,
            Some(TopLevelCommand::SetKey { key: "sk-or-v1-abc".to_string() })
        );
    }

    #[test]
    fn test_ask_subcommand() {
        let actual = Cli::try_parse_from(["qcode", "--verbose", "ask", "hi"]).unwrap();
        assert!(actual.verbose);
        assert_eq!(actual.command, Some(TopLevelCommand::Ask { prompt: "hi".to_string() }));
    }
}
