//! Client configuration.
//!
//! Read from `<config dir>/listinator/config.json`, then overridden by the
//! environment:
//! - `LISTINATOR_URL` - Server URL (default: `http://localhost:8080`)
//! - `LISTINATOR_USER` - Account to sign in with
//! - `LISTINATOR_PASSWORD` - Password for that account (never saved)

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::Credentials;
use crate::notifications::NotificationSettings;

const APP_NAME: &str = "listinator";
const CONFIG_FILE: &str = "config.json";

/// Default URL for local development.
pub const DEFAULT_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme, host and port of the Listinator server.
    pub base_url: String,
    /// Account name used to sign in before each command.
    pub user: Option<String>,
    #[serde(skip)]
    pub password: Option<String>,
    pub notifications: NotificationSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            user: None,
            password: None,
            notifications: NotificationSettings::default(),
        }
    }
}

impl ClientConfig {
    /// Load the config file and apply environment overrides.
    /// Falls back to defaults if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let config = match get_config_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;

        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Apply `LISTINATOR_*` overrides looked up through `var`.
    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = var("LISTINATOR_URL") {
            self.base_url = url;
        }
        if let Some(user) = var("LISTINATOR_USER") {
            self.user = Some(user);
        }
        if let Some(password) = var("LISTINATOR_PASSWORD") {
            self.password = Some(password);
        }
        self
    }

    /// Credentials to sign in with, when both a user and a password are set.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.user, &self.password) {
            (Some(name), Some(password)) => Some(Credentials {
                name: name.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }

    /// Save the configuration to the user's config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = get_config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
