use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use colored::Colorize;
use inquire::error::InquireError;
use inquire::ui::{RenderConfig, Styled};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use qcode_display::{MarkdownFormat, ModelListFormat, TitleFormat};
use qcode_domain::{
    language_for_path, CompletionService, CredentialStore, Environment, ModelCatalogService,
    ModelDescriptor, ModelId, PromptTemplate, Topic, DEFAULT_LANGUAGE,
};
use strum::IntoEnumIterator;
use tracing::{info, warn};

use crate::cli::{Cli, TopLevelCommand};
use crate::command::Command;
use crate::info::Info;
use crate::shell::{ChatShell, Role, UiEvent, UiRequest};
use crate::spinner::SpinnerManager;

/// Model picker entry.
struct ModelOption(ModelDescriptor);

impl std::fmt::Display for ModelOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0.display_name, format!("({})", self.0.id).dimmed())
    }
}

#[derive(Default)]
struct UiState {
    models: Vec<ModelDescriptor>,
    errored: bool,
}

pub struct UI<S, K> {
    shell: ChatShell<S, K>,
    env: Environment,
    model: ModelId,
    cli: Cli,
    state: UiState,
    spinner: SpinnerManager,
    markdown: MarkdownFormat,
}

impl<S, K> UI<S, K>
where
    S: ModelCatalogService + CompletionService,
    K: CredentialStore,
{
    pub fn init(cli: Cli, env: Environment, services: Arc<S>, credentials: Arc<K>) -> Self {
        let model = cli
            .model
            .as_deref()
            .map(ModelId::new)
            .unwrap_or_else(|| env.default_model.clone());

        Self {
            shell: ChatShell::new(services, credentials),
            env,
            model,
            cli,
            state: UiState::default(),
            spinner: SpinnerManager::new(),
            markdown: MarkdownFormat::new(),
        }
    }

    /// Runs the requested command or the interactive loop. Returns whether
    /// the last request failed, for the exit status.
    pub async fn run(&mut self) -> bool {
        if let Err(error) = self.run_inner().await {
            let _ = self.spinner.stop(None);
            eprintln!("{}", TitleFormat::error(format!("{error:#}")));
            return true;
        }
        self.state.errored
    }

    async fn run_inner(&mut self) -> Result<()> {
        if let Some(command) = self.cli.command.clone() {
            return match command {
                TopLevelCommand::Models => self.request(UiRequest::LoadModels).await,
                TopLevelCommand::SetKey { key } => self.request(UiRequest::SetApiKey(key)).await,
                TopLevelCommand::Ask { prompt } => self.on_message(prompt).await,
            };
        }

        if let Some(prompt) = self.cli.prompt.clone() {
            return self.on_message(prompt).await;
        }

        println!("{}", TitleFormat::info("QCode Chat").sub_title("type /help for commands"));
        println!("{}", Info::environment(&self.env, &self.model));

        loop {
            let input = match Text::new("›")
                .with_help_message("Ask about your code, or type a /command")
                .prompt()
            {
                Ok(input) => input,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    return Ok(());
                }
                Err(error) => return Err(error.into()),
            };
            if input.trim().is_empty() {
                continue;
            }

            let command = match Command::parse(&input) {
                Ok(command) => command,
                Err(error) => {
                    eprintln!("{}", TitleFormat::error(error.to_string()));
                    continue;
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("User interrupted request with Ctrl+C");
                }
                result = self.on_command(command) => {
                    match result {
                        Ok(true) => return Ok(()),
                        Ok(false) => {}
                        Err(error) => {
                            self.spinner.stop(None)?;
                            eprintln!("{}", TitleFormat::error(format!("{error:#}")));
                        }
                    }
                }
            }

            self.spinner.stop(None)?;
        }
    }

    /// Returns `true` when the user asked to quit.
    async fn on_command(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Message(text) => self.on_message(text).await?,
            Command::Models => self.request(UiRequest::ReloadModels).await?,
            Command::Model(Some(model)) => self.switch_model(model),
            Command::Model(None) => {
                if let Some(model) = self.select_model().await? {
                    self.switch_model(model);
                }
            }
            Command::Key => {
                if let Some(key) = self.prompt_key()? {
                    self.request(UiRequest::SetApiKey(key)).await?;
                }
            }
            Command::Explain(path) => {
                let (language, name, code) = read_source(&path).await?;
                self.on_template("Explaining", &name, PromptTemplate::explain_code(language, &name, &code))
                    .await?;
            }
            Command::Bugs(path) => {
                let (language, name, code) = read_source(&path).await?;
                self.on_template("Checking for bugs", &name, PromptTemplate::find_bugs(language, &name, &code))
                    .await?;
            }
            Command::Errors(path) => {
                let (language, name, code) = read_source(&path).await?;
                self.on_template("Detecting errors", &name, PromptTemplate::detect_errors(language, &code))
                    .await?;
            }
            Command::Why(message) => {
                self.on_template("Explaining error", &message, PromptTemplate::explain_error(&message))
                    .await?;
            }
            Command::Examples(topic) => {
                if let Some(topic) = self.resolve_topic(topic)? {
                    let prompt = PromptTemplate::examples(topic, DEFAULT_LANGUAGE);
                    self.on_template("Examples", &topic.to_string(), prompt).await?;
                }
            }
            Command::Practice(topic) => {
                if let Some(topic) = self.resolve_topic(topic)? {
                    let prompt = PromptTemplate::practice(topic, DEFAULT_LANGUAGE);
                    self.on_template("Practice", &topic.to_string(), prompt).await?;
                }
            }
            Command::Help => println!("{}", Info::help()),
            Command::Exit => return Ok(true),
        }
        Ok(false)
    }

    async fn on_message(&mut self, text: String) -> Result<()> {
        let model = self.model.clone();
        self.request(UiRequest::SendMessage { text, model }).await
    }

    async fn on_template(&mut self, title: &str, subject: &str, prompt: String) -> Result<()> {
        println!("{}", TitleFormat::action(title).sub_title(subject));
        self.on_message(prompt).await
    }

    async fn request(&mut self, request: UiRequest) -> Result<()> {
        let Self { shell, spinner, markdown, state, model, .. } = self;
        state.errored = false;
        shell
            .handle(request, |event| {
                if let Err(error) = render(event, spinner, markdown, state, model) {
                    warn!(error = %error, "Failed to render event");
                }
            })
            .await;
        Ok(())
    }

    fn switch_model(&mut self, model: ModelId) {
        println!("{}", TitleFormat::success("model selected").sub_title(model.as_str()));
        self.model = model;
    }

    /// Lets the user pick from the catalog with the current model
    /// pre-selected. `None` when the picker was dismissed.
    async fn select_model(&mut self) -> Result<Option<ModelId>> {
        if self.state.models.is_empty() {
            self.spinner.start(Some("Loading models"))?;
            self.request(UiRequest::LoadModels).await?;
            self.spinner.stop(None)?;
        }
        if self.state.models.is_empty() {
            return Ok(None);
        }

        let starting_cursor = self
            .state
            .models
            .iter()
            .position(|model| model.id == self.model)
            .unwrap_or(0);
        let options = self
            .state
            .models
            .iter()
            .cloned()
            .map(ModelOption)
            .collect::<Vec<_>>();

        match Select::new("Select a model:", options)
            .with_help_message("Type a model name or use arrow keys to navigate and Enter to select")
            .with_render_config(render_config())
            .with_starting_cursor(starting_cursor)
            .prompt()
        {
            Ok(option) => Ok(Some(option.0.id)),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn prompt_key(&self) -> Result<Option<String>> {
        match Password::new("OpenRouter API key:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .with_help_message("Get a key at https://openrouter.ai/keys")
            .prompt()
        {
            Ok(key) if key.trim().is_empty() => Ok(None),
            Ok(key) => Ok(Some(key)),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn resolve_topic(&self, topic: Option<Topic>) -> Result<Option<Topic>> {
        if topic.is_some() {
            return Ok(topic);
        }
        match Select::new("Select a topic:", Topic::iter().collect())
            .with_render_config(render_config())
            .prompt()
        {
            Ok(topic) => Ok(Some(topic)),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }
}

fn render(
    event: UiEvent,
    spinner: &mut SpinnerManager,
    markdown: &MarkdownFormat,
    state: &mut UiState,
    current: &ModelId,
) -> Result<()> {
    match event {
        // The terminal already shows what the user typed.
        UiEvent::AddMessage { role: Role::User, .. } => {}
        UiEvent::AddMessage { role: Role::Assistant, content, model } => {
            let title = TitleFormat::info(Role::Assistant.to_string());
            let title = match model {
                Some(model) => title.sub_title(model.as_str()),
                None => title,
            };
            println!("{title}\n\n{}\n", markdown.render(content));
        }
        UiEvent::ShowLoading => spinner.start(None)?,
        UiEvent::HideLoading => spinner.stop(None)?,
        UiEvent::ShowError(message) => {
            spinner.stop(None)?;
            state.errored = true;
            eprintln!("{}", TitleFormat::error(message));
        }
        UiEvent::ApiKeySaved => println!("{}", TitleFormat::success("API key saved")),
        UiEvent::ModelsLoaded(models) => {
            println!("{}", ModelListFormat::new(&models).current(current).format());
            state.models = models;
        }
    }
    Ok(())
}

fn render_config() -> RenderConfig<'static> {
    RenderConfig::default()
        .with_scroll_up_prefix(Styled::new("⇡"))
        .with_scroll_down_prefix(Styled::new("⇣"))
        .with_highlighted_option_prefix(Styled::new("➤"))
}

/// Reads a source file for one of the code actions, returning its language,
/// file name and content.
async fn read_source(path: &Path) -> Result<(&'static str, String, String)> {
    let code = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if code.trim().is_empty() {
        anyhow::bail!("{} is empty", path.display());
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok((language_for_path(path), name, code))
}
