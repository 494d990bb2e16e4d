//! Handles settings for the application.
//!
//! Settings are read from an optional TOML file (see
//! `config/money_tracker.toml`) and then from `MONEY_TRACKER__*` environment
//! variables, e.g. `MONEY_TRACKER__SERVER__PORT=8080`.
use std::path::PathBuf;

use chrono_tz::Tz;
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config/money_tracker.toml";

#[derive(Debug, Parser)]
#[command(name = "money_tracker", about = "Personal finance tracker HTTP server")]
pub struct Cli {
    /// Path of the TOML settings file.
    #[arg(long, env = "MONEY_TRACKER_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
    /// IANA name, e.g. `Europe/Rome`.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Default, Deserialize)]
pub struct Ai {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub site_url: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub ai: Ai,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
            timezone: default_timezone(),
        }
    }
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: None,
            port: default_port(),
        }
    }
}

impl App {
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|err| ConfigError::Message(format!("app.timezone: {err}")))
    }
}

impl Ai {
    /// Configured client settings; `OPENROUTER_API_KEY` fills a missing key.
    pub fn parser_config(&self) -> ai_parser::OpenRouterConfig {
        let defaults = ai_parser::OpenRouterConfig::default();
        let api_key = self
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENROUTER_API_KEY").ok());

        ai_parser::OpenRouterConfig {
            base_url: self.base_url.clone().unwrap_or(defaults.base_url),
            api_key,
            model: self.model.clone().unwrap_or(defaults.model),
            site_url: self.site_url.clone().unwrap_or(defaults.site_url),
            title: self.title.clone().unwrap_or(defaults.title),
        }
    }
}

impl Settings {
    pub fn new(cli: &Cli) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(cli.config.as_path()).required(false))
            .add_source(
                Environment::with_prefix("MONEY_TRACKER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let cli = Cli {
            config: PathBuf::from("does/not/exist.toml"),
        };
        let settings = Settings::new(&cli).unwrap();
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.app.timezone().unwrap(), Tz::UTC);
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let app = App {
            level: default_level(),
            timezone: "Mars/Olympus".to_string(),
        };
        assert!(app.timezone().is_err());
    }

    #[test]
    fn explicit_key_wins() {
        let ai = Ai {
            api_key: Some("sk-test".to_string()),
            model: Some("openai/gpt-4o-mini".to_string()),
            ..Ai::default()
        };
        let config = ai.parser_config();
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model, "openai/gpt-4o-mini");
        assert_eq!(config.base_url, "https://openrouter.ai/api/v1");
    }
}
