use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use skysearch_core::{Config, HistoryStore, SkySearch};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skysearch", version, about = "Current weather and 5-day forecast by city")]
pub struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather and the 5-day forecast for a city.
    Show {
        /// City name; several words are joined with spaces.
        #[arg(required = true)]
        city: Vec<String>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,

        /// Don't add the city to the search history.
        #[arg(long)]
        no_save: bool,
    },

    /// Manage previously searched cities.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    /// List remembered cities, oldest first.
    List {
        /// Print the list as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Forget a city by its id.
    Remove {
        id: i64,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(config_for_configure(Config::load())),
            Command::Show { city, json, no_save } => {
                show(&Config::load()?, &city.join(" "), json, no_save).await
            }
            Command::History { action } => history(&Config::load()?, action).await,
        }
    }
}

/// `configure` rewrites the file, so a broken one must not block it.
fn config_for_configure(loaded: anyhow::Result<Config>) -> Config {
    loaded.unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable configuration: {:#}", e);
        Config::default()
    })
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key cannot be blank");
    }

    config.set_api_key(api_key.to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(config: &Config, city: &str, json: bool, no_save: bool) -> anyhow::Result<()> {
    if city.trim().is_empty() {
        bail!("City cannot be blank");
    }

    let app = SkySearch::from_config(config)?;

    let weather = if no_save {
        app.get_weather(city).await
    } else {
        app.search(city).await.map(|outcome| {
            if let Err(e) = &outcome.history {
                eprintln!("{}", e.user_message());
            }
            outcome.weather
        })
    };

    let weather = match weather {
        Ok(weather) => weather,
        Err(e) => {
            tracing::error!("Error fetching weather for city: {}", e);
            bail!("{}", e.user_message());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&weather)?);
    } else {
        let today = chrono::Local::now().date_naive();
        print!("{}", render::forecast(&weather, chrono::Utc::now(), today));
    }

    Ok(())
}

async fn history(config: &Config, action: HistoryAction) -> anyhow::Result<()> {
    // History commands don't need an API key, so skip the weather source.
    let store = HistoryStore::from_file(config.history_file_path()?);

    match action {
        HistoryAction::List { json } => {
            let entries = store.list().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print!("{}", render::history(&entries));
            }
        }
        HistoryAction::Remove { id } => {
            if let Err(e) = store.remove(id).await {
                tracing::error!("Error deleting city from search history: {}", e);
                bail!("Failed to delete city");
            }
            println!("City deleted successfully");
        }
    }

    Ok(())
}
