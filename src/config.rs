use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use log::info;
use thiserror::Error;

use crate::domain::Policies;
use crate::persistence::json_file::FailurePolicy;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub auctions_file: PathBuf,
    pub users_file: PathBuf,
    pub policies: Policies,
    pub failures: FailurePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            auctions_file: PathBuf::from("./data.json"),
            users_file: PathBuf::from("./usuarios.json"),
            policies: Policies::default(),
            failures: FailurePolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, falling back to the
    /// defaults for absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();
        Ok(AppConfig {
            host: load(&lookup, "HOST", defaults.host)?,
            port: load(&lookup, "PORT", defaults.port)?,
            auctions_file: PathBuf::from(load(
                &lookup,
                "AUCTIONS_FILE",
                defaults.auctions_file.display().to_string(),
            )?),
            users_file: PathBuf::from(load(
                &lookup,
                "USERS_FILE",
                defaults.users_file.display().to_string(),
            )?),
            policies: Policies {
                ids: load(&lookup, "ID_POLICY", defaults.policies.ids)?,
                bids: load(&lookup, "BID_POLICY", defaults.policies.bids)?,
            },
            failures: load(&lookup, "FAILURE_POLICY", defaults.failures)?,
        })
    }
}

fn load<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key: key.to_string(),
            value: value.clone(),
            reason: e.to_string(),
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
