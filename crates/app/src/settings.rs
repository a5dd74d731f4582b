//! Handles settings for the application. Configuration is written in
//! `settings.toml`.
//!
//! See `settings.toml` for the configuration.
use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
}

/// Initial family members, written only into an empty store.
#[derive(Debug, Deserialize)]
pub struct SeedUser {
    pub id: String,
    pub name: String,
    pub balance_paise: i64,
    pub role: engine::Role,
}

#[derive(Debug, Deserialize)]
pub struct Reconciliation {
    pub interval_minutes: u64,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub seed: Option<Vec<SeedUser>>,
    pub reconciliation: Option<Reconciliation>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .build()?;

        settings.try_deserialize()
    }
}
