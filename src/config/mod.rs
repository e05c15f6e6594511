mod basic;
mod database;

pub use basic::BasicConfig;
pub use database::{DatabaseBackend, DatabaseConfig};

use crate::error::ConfigError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Value as FigmentValue},
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Run configuration, built once in `main` and passed down explicitly.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Process-level settings (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Connection parameters; `DB_*` environment variables land here.
    #[serde(default)]
    pub database: DatabaseConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const DB_ENV_PREFIX: &str = "DB_";

/// `DB_*` keys taken verbatim. `Env` parses values, so `DB_PASS=007` would become `7`.
const RAW_STRING_KEYS: &[&str] = &["host", "name", "user", "pass", "sqlite_path"];

fn is_raw_string_key(key: &str) -> bool {
    RAW_STRING_KEYS.iter().any(|raw| key.eq_ignore_ascii_case(raw))
}

impl Config {
    /// Defaults, then `config.toml` if present, then `DB_*` environment variables.
    pub fn figment() -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let figment = if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment.merge(Toml::file(DEFAULT_CONFIG_FILE))
        } else {
            figment
        };
        let parsed = Env::prefixed(DB_ENV_PREFIX)
            .filter(|key| !is_raw_string_key(key.as_str()))
            .map(|key| format!("database.{}", key.as_str().to_ascii_lowercase()).into());
        let raw: Dict = Env::prefixed(DB_ENV_PREFIX)
            .iter()
            .filter(|(key, _)| is_raw_string_key(key.as_str()))
            .map(|(key, value)| (key.as_str().to_ascii_lowercase(), FigmentValue::from(value)))
            .collect();

        figment
            .merge(parsed)
            .merge(Serialized::default("database", raw))
    }

    /// Extracts and validates the configuration.
    pub fn load() -> Result<Self, ConfigError> {
        let cfg: Self = Self::figment().extract()?;
        cfg.database.validate()?;
        Ok(cfg)
    }
}

/// Accepts numbers where a string is expected; `pass = 1234` in config.toml is an integer.
pub(crate) fn deserialize_string_lax<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;

    match v {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(serde::de::Error::custom("expected a string or a number")),
    }
}
