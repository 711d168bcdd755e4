//! Configuration and settings management
//!
//! Loads settings from environment variables and optional config files.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Webex bot account email; identifies the bot, logged at startup
    pub bot_email: String,

    /// Webex bot bearer token, used for both attachment download and reply posting
    pub bot_token: String,

    /// Base URL of the Webex REST API
    #[serde(default = "default_webex_api_base")]
    pub webex_api_base: String,

    /// Port the webhook HTTP listener binds to
    #[serde(default = "default_webhook_port")]
    pub webhook_port: u16,

    /// Timeout in seconds applied to all Webex-bound HTTP calls
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Maximum attachment size the fetcher will accept, in bytes
    #[serde(default = "default_max_attachment_bytes")]
    pub max_attachment_bytes: u64,
}

fn default_webex_api_base() -> String {
    "https://api.ciscospark.com/v1".to_string()
}

const fn default_webhook_port() -> u16 {
    8080
}

const fn default_http_timeout_secs() -> u64 {
    30
}

/// 20 MB — unranged downloads of caller-supplied URLs need a ceiling.
const fn default_max_attachment_bytes() -> u64 {
    20 * 1024 * 1024
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use hotdog_bot::config::Settings;
    ///
    /// let settings = Settings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails or a required setting
    /// (`BOT_EMAIL`, `BOT_TOKEN`) is missing.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(File::with_name("config/default").required(false))
            // Add in the current environment file
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked into git
            .add_source(File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of APP)
            .add_source(Environment::with_prefix("APP").separator("__"))
            // Also add settings from environment variables directly (without prefix)
            // Note: Environment::default() auto-converts UPPER_SNAKE_CASE to snake_case
            // ignore_empty treats empty env vars as unset
            .add_source(Environment::default().ignore_empty(true))
            .build()?;

        s.try_deserialize()
    }
}
