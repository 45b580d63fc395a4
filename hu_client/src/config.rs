//! Client configuration management.
//!
//! Consolidates all environment variable reads. Command-line flags take
//! precedence over the environment, which takes precedence over defaults.

use hu_poker::constants::DEFAULT_TURN_TICKS;
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Matchmaking server base URL
    pub server_url: String,
    /// Game to join. A new game is created when unset.
    pub game_id: Option<String>,
    /// Length of the turn countdown, in ticks
    pub turn_ticks: u32,
    /// Time between countdown ticks
    pub tick_interval: Duration,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub server_url: Option<String>,
    pub game_id: Option<String>,
    pub turn_ticks: Option<u32>,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable can't be parsed or the result
    /// fails [`ClientConfig::validate`].
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        let server_url = overrides
            .server_url
            .or_else(|| std::env::var("HU_SERVER_URL").ok())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let game_id = overrides
            .game_id
            .or_else(|| std::env::var("HU_GAME_ID").ok())
            .filter(|id| !id.trim().is_empty());

        let turn_ticks = match overrides.turn_ticks {
            Some(ticks) => ticks,
            None => parse_env_or("HU_TURN_TIMEOUT_SECS", DEFAULT_TURN_TICKS)?,
        };

        let tick_interval = Duration::from_millis(parse_env_or(
            "HU_TICK_INTERVAL_MS",
            DEFAULT_TICK_INTERVAL_MS,
        )?);

        let config = Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            game_id,
            turn_ticks,
            tick_interval,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "HU_SERVER_URL".to_string(),
                reason: format!("'{}' must start with http:// or https://", self.server_url),
            });
        }

        if self.turn_ticks == 0 {
            return Err(ConfigError::Invalid {
                var: "HU_TURN_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.tick_interval.is_zero() {
            return Err(ConfigError::Invalid {
                var: "HU_TICK_INTERVAL_MS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            game_id: None,
            turn_ticks: DEFAULT_TURN_TICKS,
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parse an environment variable, falling back to `default` when it's unset.
/// A set but unparsable value is an error rather than silently ignored.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("'{value}' is not a valid value"),
        }),
        Err(_) => Ok(default),
    }
}
