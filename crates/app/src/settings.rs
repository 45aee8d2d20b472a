//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` and from `VOCAB__*` environment variables, the
//! latter taking precedence.
//!
//! See `settings.example.toml` for the configuration.
use config::{Config, ConfigError, Environment, File};
use engine::{CaptureSteps, QuizSettings};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Telegram {
    pub token: String,
    pub owner_id: u64,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    #[default]
    Memory,
    Sqlite(String),
    Url(String),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub telegram: Telegram,
    #[serde(default)]
    pub database: Database,
    #[serde(default)]
    pub capture: CaptureSteps,
    #[serde(default)]
    pub quiz: QuizSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("VOCAB").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
