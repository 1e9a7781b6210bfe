use std::time::{Duration, Instant};

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;
use tokio::task::JoinHandle;

const WORDS: [&str; 6] = [
    "Thinking",
    "Reading your code",
    "Explaining",
    "Reasoning",
    "Writing examples",
    "Asking the model",
];

/// Spinner shown while a request is in flight, with an elapsed-time counter.
#[derive(Default)]
pub struct SpinnerManager {
    spinner: Option<ProgressBar>,
    tracker: Option<JoinHandle<()>>,
}

impl SpinnerManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.spinner.is_some()
    }

    /// Starts the spinner, replacing any running one. Without a message a
    /// random word is shown.
    pub fn start(&mut self, message: Option<&str>) -> Result<()> {
        self.stop(None)?;

        let word = match message {
            Some(message) => message.to_string(),
            None => WORDS
                .choose(&mut rand::thread_rng())
                .unwrap_or(&WORDS[0])
                .to_string(),
        };

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
                .template("{spinner:.green} {msg}")?,
        );
        pb.enable_steady_tick(Duration::from_millis(60));
        pb.set_message(status(&word, 0));

        let started = Instant::now();
        let tracked = pb.clone();
        self.tracker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(500));
            loop {
                interval.tick().await;
                tracked.set_message(status(&word, started.elapsed().as_secs()));
            }
        }));
        self.spinner = Some(pb);

        Ok(())
    }

    /// Stops the spinner, then prints `message` if given.
    pub fn stop(&mut self, message: Option<String>) -> Result<()> {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        if let Some(tracker) = self.tracker.take() {
            tracker.abort();
        }
        if let Some(message) = message {
            println!("{message}");
        }
        Ok(())
    }
}

fn status(word: &str, seconds: u64) -> String {
    format!(
        "{} {}s · {}",
        word.green().bold(),
        seconds,
        "Ctrl+C to interrupt".white().dimmed()
    )
}
