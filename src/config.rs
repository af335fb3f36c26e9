use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::debug;

use crate::bank::BankSource;
use crate::error::ConfigError;

const ENV_PREFIX: &str = "OPIC_";

/// Trait for types that can retrieve their configuration key from environment variables
pub trait KeyFromEnv {
    /// The environment variable name for this client's API key
    const KEY_NAME: &'static str;

    /// Find the API key by checking the .env file first, then the environment
    fn find_key() -> Option<String> {
        // Silently ignore a missing .env file
        let _ = dotenvy::dotenv();

        env::var(Self::KEY_NAME).ok().filter(|k| !k.trim().is_empty())
    }

    fn require_key() -> Result<String, ConfigError> {
        Self::find_key().ok_or_else(|| ConfigError::Missing(Self::KEY_NAME.to_string()))
    }
}

/// Runtime settings for exam assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamConfig {
    pub topic_map_path: PathBuf,
    pub bank_source: BankSource,
    pub bank_path: PathBuf,
    pub seed: Option<u64>,
    pub expand: bool,
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            topic_map_path: PathBuf::from("data/survey_topic_map.json"),
            bank_source: BankSource::File,
            bank_path: PathBuf::from("data/opic_question.json"),
            seed: None,
            expand: false,
        }
    }
}

impl ExamConfig {
    /// Build a config from `OPIC_*` variables, falling back to defaults for unset keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ExamConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(&format!("{ENV_PREFIX}{key}")).filter(|v| !v.trim().is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = get("TOPIC_MAP") {
            config.topic_map_path = PathBuf::from(path);
        }
        if let Some(path) = get("BANK_PATH") {
            config.bank_path = PathBuf::from(path);
        }
        if let Some(source) = get("BANK_SOURCE") {
            config.bank_source = BankSource::from_str(&source).map_err(|_| ConfigError::Invalid {
                key: format!("{ENV_PREFIX}BANK_SOURCE"),
                value: source.clone(),
            })?;
        }
        if let Some(seed) = get("SEED") {
            let parsed = seed.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                key: format!("{ENV_PREFIX}SEED"),
                value: seed.clone(),
            })?;
            config.seed = Some(parsed);
        }
        if let Some(expand) = get("EXPAND") {
            config.expand = parse_bool(&expand).ok_or_else(|| ConfigError::Invalid {
                key: format!("{ENV_PREFIX}EXPAND"),
                value: expand.clone(),
            })?;
        }

        debug!(?config, "Loaded exam configuration");
        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
