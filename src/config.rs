use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_DB_PATH: &str = "/var/lib/notary/notary.db";
/// Size of the public feed when a query names no limit.
pub const DEFAULT_RECENT_LIMIT: usize = 6;
/// `NOTARY_DB_PATH` value selecting a throwaway in-memory database.
pub const IN_MEMORY: &str = ":memory:";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    InMemory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub rollup_server_url: String,
    pub database: DatabaseLocation,
    pub recent_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rollup_server_url = lookup("ROLLUP_HTTP_SERVER_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("ROLLUP_HTTP_SERVER_URL"))?
            .trim_end_matches('/')
            .to_string();

        let database = match lookup("NOTARY_DB_PATH") {
            Some(path) if path == IN_MEMORY => DatabaseLocation::InMemory,
            Some(path) if !path.trim().is_empty() => DatabaseLocation::File(PathBuf::from(path)),
            _ => DatabaseLocation::File(PathBuf::from(DEFAULT_DB_PATH)),
        };

        let recent_limit = match lookup("NOTARY_RECENT_LIMIT") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::Invalid {
                    name: "NOTARY_RECENT_LIMIT",
                    value: raw,
                })?,
            None => DEFAULT_RECENT_LIMIT,
        };

        Ok(Self {
            rollup_server_url,
            database,
            recent_limit,
        })
    }
}
