use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use weather_core::{Config, OpenWeatherClient, Pipeline, RunOutcome, pipeline::validate_query};

use crate::display;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-dashboard",
    version,
    about = "Current weather and a 5-day forecast for any city"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// HTTP timeout in seconds for each API call.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Root URL of the OpenWeather API.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Where to write the HTML dashboard page.
    #[arg(long, global = true, default_value = "weather-dashboard.html")]
    pub page: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prompt for city names until cancelled (default).
    Interactive,

    /// Show the dashboard for a single city and exit.
    Show {
        /// City name, e.g. "London".
        city: String,
    },

    /// Store the OpenWeather API key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        match self.command {
            Some(Command::Configure) => configure().map(|()| ExitCode::SUCCESS),
            Some(Command::Show { ref city }) => {
                if self.show(city).await? {
                    Ok(ExitCode::SUCCESS)
                } else {
                    Ok(ExitCode::FAILURE)
                }
            }
            Some(Command::Interactive) | None => {
                self.interactive().await.map(|()| ExitCode::SUCCESS)
            }
        }
    }

    /// One run for `city`. Returns `false` when the run halted; the error has
    /// already been shown by then. Blank input prompts without touching config.
    async fn show(&self, city: &str) -> Result<bool> {
        if validate_query(city).is_err() {
            self.present(&RunOutcome::Prompting)?;
            return Ok(true);
        }

        let pipeline = self.pipeline()?;
        let outcome = pipeline.on_submit(city).await;
        self.present(&outcome)?;

        Ok(!matches!(outcome, RunOutcome::Halted(_)))
    }

    /// Build the pipeline from config file, environment and flags.
    /// Fails fast when no API key is available.
    fn pipeline(&self) -> Result<Pipeline<OpenWeatherClient>> {
        let mut config = Config::load()?.with_env(|name| std::env::var(name).ok());

        if let Some(timeout) = self.timeout {
            config.timeout_secs = Some(timeout);
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = Some(base_url.clone());
        }

        let settings = config.resolve()?;
        tracing::debug!(?settings, "configuration resolved");

        let client = OpenWeatherClient::new(settings).context("Failed to build HTTP client")?;
        Ok(Pipeline::new(client))
    }

    async fn interactive(&self) -> Result<()> {
        let pipeline = self.pipeline()?;
        println!("🌦️ Weather Dashboard (Esc or Ctrl-C to quit)");

        loop {
            let input = match Text::new("Enter city name").prompt() {
                Ok(input) => input,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    return Ok(());
                }
                Err(err) => return Err(err).context("Failed to read city name"),
            };

            let outcome = pipeline.on_submit(&input).await;
            self.present(&outcome)?;
        }
    }

    fn present(&self, outcome: &RunOutcome) -> Result<()> {
        print!("{}", display::terminal(outcome));

        if matches!(outcome, RunOutcome::Prompting) {
            return Ok(());
        }

        let page = display::page(outcome)?;
        std::fs::write(&self.page, page)
            .with_context(|| format!("Failed to write dashboard page: {}", self.page.display()))?;
        println!("Dashboard page written to {}", self.page.display());
        Ok(())
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key);
    let path = config.save()?;

    println!("API key saved to {}", path.display());
    Ok(())
}
