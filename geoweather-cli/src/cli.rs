use anyhow::Context;
use chrono::Local;
use clap::{ArgAction, Parser, Subcommand};
use geoweather_core::{Config, WeatherReport, config::API_KEY_ENV, lookup, provider_from_config};
use inquire::{Password, PasswordDisplayMode, required};
use tracing::debug;

const BANNER: &str = "+-------------+\n| Weather App |\n+-------------+";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "geoweather",
    version,
    about = "Current temperature for a city",
    subcommand_negates_reqs = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// City name, optionally with state and country codes, e.g. "Edmonton" or "London,GB".
    #[arg(required = true)]
    pub city: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an OpenWeatherMap API key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            None => {
                let city = self.city.context("A city name is required")?;
                show(&city).await
            }
        }
    }
}

async fn show(city: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let provider = provider_from_config(&config, std::env::var(API_KEY_ENV).ok())?;

    let report = lookup(provider.as_ref(), city).await?;

    debug!(
        observed = %report.observation_time.with_timezone(&Local).format("%Y-%m-%d %H:%M %Z"),
        condition = %report.condition,
        "lookup finished"
    );

    println!("{}", render_report(&report));
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_validator(required!("API key must not be empty"))
        .with_help_message("Get one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key);
    let path = config.save()?;

    println!("Saved API key to {}", path.display());
    Ok(())
}

fn render_report(report: &WeatherReport) -> String {
    format!(
        "{BANNER}\nCurrent temp in {}: {:.2}°C",
        report.location_name, report.temperature_c
    )
}
