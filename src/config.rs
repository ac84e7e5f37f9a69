// Configuration read from environment variables:
// TODO_TICK_RATE_MS - event poll tick in milliseconds, default 250
// TODO_LOG_FILE     - file that receives log output; logging is off when unset
// TODO_DEMO_SEED    - true/false or 1/0, start with a sample task, default true

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub tick_rate_ms: u64,
    pub log_file: Option<PathBuf>,
    pub demo_seed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            log_file: None,
            demo_seed: true,
        }
    }
}

impl Config {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Build from any key lookup; lets tests avoid touching the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let tick_rate_ms = match lookup("TODO_TICK_RATE_MS") {
            Some(raw) => {
                let millis: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("TODO_TICK_RATE_MS".to_string(), raw.clone()))?;
                if millis == 0 {
                    return Err(ConfigError::InvalidValue("TODO_TICK_RATE_MS".to_string(), raw));
                }
                millis
            }
            None => defaults.tick_rate_ms,
        };

        let log_file = lookup("TODO_LOG_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let demo_seed = match lookup("TODO_DEMO_SEED") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| ConfigError::InvalidValue("TODO_DEMO_SEED".to_string(), raw))?,
            None => defaults.demo_seed,
        };

        Ok(Self {
            tick_rate_ms,
            log_file,
            demo_seed,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
