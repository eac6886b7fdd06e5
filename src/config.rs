//! Configuration management for uyviet-desk using the prefer crate.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default service address (the drafting server listens on 8080).
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

const USER_AGENT: &str = concat!("uyviet-desk/", env!("CARGO_PKG_VERSION"));

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the drafting service.
    pub server_url: String,
    /// User agent for HTTP requests.
    pub user_agent: String,
    /// Request timeout in seconds (None = wait indefinitely).
    pub request_timeout: Option<u64>,
    /// Directory downloads are saved into.
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let output_dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            request_timeout: None,
            output_dir,
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the drafting service.
    #[serde(default)]
    pub server_url: Option<String>,
    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub request_timeout: Option<u64>,
    /// Download directory; `~` is expanded.
    #[serde(default)]
    pub output_dir: Option<String>,
}

impl Config {
    /// Load configuration using prefer crate.
    /// Automatically discovers uyviet config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("uyviet").await {
            Ok(pref_config) => {
                let server_url: Option<String> = pref_config.get("server_url").ok();
                let user_agent: Option<String> = pref_config.get("user_agent").ok();
                let request_timeout: Option<u64> = pref_config.get("request_timeout").ok();
                let output_dir: Option<String> = pref_config.get("output_dir").ok();

                Config {
                    server_url,
                    user_agent,
                    request_timeout,
                    output_dir,
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref server_url) = self.server_url {
            settings.server_url = server_url.clone();
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = Some(timeout);
        }
        if let Some(ref output_dir) = self.output_dir {
            settings.output_dir = expand_path(output_dir);
        }
    }
}

/// Expand `~` in a user-supplied path.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Load settings from configuration.
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}
