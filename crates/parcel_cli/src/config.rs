//! Environment and argument driven CLI configuration.
//!
//! # Invariants
//! - Blank environment values fall back to defaults.
//! - Logging stays disabled unless a log directory is configured.

use parcel_core::{default_log_level, ClientId};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "PARCEL_TRACKER_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "PARCEL_TRACKER_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "PARCEL_TRACKER_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "tracker.db";
const DEFAULT_CLIENT: ClientId = 1;

/// Resolved settings for one CLI run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub client: ClientId,
}

impl CliConfig {
    /// Resolves configuration from the process environment and arguments.
    pub fn from_env(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        Self::resolve(|key| std::env::var(key).ok(), args)
    }

    fn resolve(
        lookup: impl Fn(&str) -> Option<String>,
        args: impl IntoIterator<Item = String>,
    ) -> Result<Self, String> {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let client = match args.into_iter().next() {
            Some(raw) => raw
                .trim()
                .parse::<ClientId>()
                .map_err(|err| format!("invalid client id `{raw}`: {err}"))?,
            None => DEFAULT_CLIENT,
        };

        Ok(Self {
            db_path: non_blank(DB_PATH_ENV)
                .map_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME), PathBuf::from),
            log_level: non_blank(LOG_LEVEL_ENV)
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: non_blank(LOG_DIR_ENV),
            client,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CliConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use parcel_core::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn resolve(vars: &[(&str, &str)], args: &[&str]) -> Result<CliConfig, String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CliConfig::resolve(
            |key| vars.get(key).cloned(),
            args.iter().map(|arg| arg.to_string()),
        )
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = resolve(&[], &[]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("tracker.db"));
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
        assert_eq!(config.client, 1);
    }

    #[test]
    fn environment_overrides_defaults_and_blank_values_are_ignored() {
        let config = resolve(
            &[
                (DB_PATH_ENV, " /tmp/parcels.db "),
                (LOG_LEVEL_ENV, "warn"),
                (LOG_DIR_ENV, "   "),
            ],
            &["1000"],
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/parcels.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, None);
        assert_eq!(config.client, 1000);
    }

    #[test]
    fn non_numeric_client_is_rejected() {
        let err = resolve(&[], &["acme"]).unwrap_err();
        assert!(err.contains("invalid client id `acme`"));
    }
}
