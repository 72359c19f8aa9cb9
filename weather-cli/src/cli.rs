use anyhow::{Context, anyhow};
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Select, Text};
use tracing::{debug, info};
use weather_core::{
    Config, Session, UiState, Units, WeatherProvider, config::DEFAULT_BASE_URL,
    provider_from_config, search,
};

use crate::render::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Search a city and see its weather")]
pub struct Cli {
    /// OpenWeather API key; overrides the config file.
    #[arg(long, env = "OPENWEATHER_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// OpenWeather API base URL; overrides the config file.
    #[arg(long, env = "OPENWEATHER_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// metric, imperial or standard.
    #[arg(long, global = true)]
    pub units: Option<Units>,

    /// Defaults to `interactive`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, base URL and units in the config file.
    Configure,

    /// Show the weather dashboard for one place and exit.
    Show {
        /// Place name, e.g. "London" or "New York".
        #[arg(required = true, num_args = 1..)]
        place: Vec<String>,
    },

    /// Search places one after another.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let file_config = Config::load()?;

        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(file_config),
            Command::Show { place } => {
                let config = file_config.with_overrides(self.api_key, self.base_url, self.units);
                show(&config, &place.join(" ")).await
            }
            Command::Interactive => {
                let config = file_config.with_overrides(self.api_key, self.base_url, self.units);
                interactive(&config).await
            }
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;

    let base_url = Text::new("API base URL:")
        .with_default(config.base_url())
        .prompt()
        .context("Failed to read base URL")?;

    let cursor = Units::all().iter().position(|u| *u == config.units).unwrap_or(0);
    let units = Select::new("Units:", Units::all().to_vec())
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to read units")?;

    config = config.with_overrides(Some(api_key), None, Some(units));
    let base_url = base_url.trim().trim_end_matches('/');
    config.base_url = (!base_url.is_empty() && base_url != DEFAULT_BASE_URL)
        .then(|| base_url.to_string());

    // Surface the missing-key hint now rather than on the first search.
    config.api_key()?;

    let path = config.save()?;
    info!(path = %path.display(), "Configuration saved");
    println!("Saved configuration to {}", path.display());

    Ok(())
}

async fn show(config: &Config, place: &str) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;
    let mut session = Session::new();

    if !search(provider.as_ref(), &mut session, place).await {
        return Err(anyhow!("Place name must not be empty"));
    }

    match session.state() {
        UiState::Error { message } => Err(anyhow!("{message}")),
        state => {
            print!("{}", render(state, &Local, config.units));
            Ok(())
        }
    }
}

async fn interactive(config: &Config) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;
    let mut session = Session::new();
    let mut redraw = true;

    loop {
        if redraw {
            println!("{}", render(session.state(), &Local, config.units));
            redraw = false;
        }

        if let UiState::Error { .. } = session.state() {
            match Confirm::new("Try Again?").with_default(true).prompt() {
                Ok(true) => {
                    session.retry();
                    redraw = true;
                    continue;
                }
                Ok(false) => break,
                Err(err) if is_cancelled(&err) => break,
                Err(err) => return Err(err).context("Failed to read answer"),
            }
        }

        let input = match Text::new("Search for a place...").prompt() {
            Ok(input) => input,
            Err(err) if is_cancelled(&err) => break,
            Err(err) => return Err(err).context("Failed to read search input"),
        };

        if submit(provider.as_ref(), &mut session, config.units, &input).await {
            redraw = true;
        }
    }

    debug!("Leaving interactive session");
    Ok(())
}

/// Like `search`, but shows the loading screen while the lookup runs.
async fn submit(
    provider: &dyn WeatherProvider,
    session: &mut Session,
    units: Units,
    input: &str,
) -> bool {
    let Some(ticket) = session.submit(input) else {
        return false;
    };

    println!("{}", render(session.state(), &Local, units));

    let result = provider.lookup(ticket.query()).await;
    session.complete(ticket, result)
}

fn is_cancelled(err: &InquireError) -> bool {
    matches!(err, InquireError::OperationCanceled | InquireError::OperationInterrupted)
}
