//! Service configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                        | Default         |
//! |---------------------------------|-----------------|
//! | `LEDGERBOOK_DATABASE_PATH`      | `ledgerbook.db` |
//! | `LEDGERBOOK_DB_MAX_CONNECTIONS` | `5`             |
//! | `LEDGERBOOK_DEFAULT_PAGE_SIZE`  | `20`            |
//! | `LEDGERBOOK_MAX_PAGE_SIZE`      | `100`           |
//! | `LEDGERBOOK_ACTOR`              | `system`        |

use std::env;
use std::path::PathBuf;

use ledgerbook_core::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SYSTEM_ACTOR};
use ledgerbook_db::DbConfig;
use serde::Serialize;

/// Page-size bounds applied to every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PagingLimits {
    /// Used when a query names no page size.
    pub default_page_size: u32,

    /// Larger page sizes fail structural validation.
    pub max_page_size: u32,
}

impl Default for PagingLimits {
    fn default() -> Self {
        PagingLimits {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    pub paging: PagingLimits,

    /// Recorded in `created_by` / `updated_by`
    pub actor: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            database_path: PathBuf::from("ledgerbook.db"),
            max_connections: 5,
            paging: PagingLimits::default(),
            actor: SYSTEM_ACTOR.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ServiceConfig::default();

        let config = ServiceConfig {
            database_path: lookup("LEDGERBOOK_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            max_connections: parse_or(
                &lookup,
                "LEDGERBOOK_DB_MAX_CONNECTIONS",
                defaults.max_connections,
            )?,

            paging: PagingLimits {
                default_page_size: parse_or(
                    &lookup,
                    "LEDGERBOOK_DEFAULT_PAGE_SIZE",
                    defaults.paging.default_page_size,
                )?,
                max_page_size: parse_or(
                    &lookup,
                    "LEDGERBOOK_MAX_PAGE_SIZE",
                    defaults.paging.max_page_size,
                )?,
            },

            actor: lookup("LEDGERBOOK_ACTOR")
                .map(|actor| actor.trim().to_string())
                .filter(|actor| !actor.is_empty())
                .unwrap_or(defaults.actor),
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "LEDGERBOOK_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        // A default larger than the cap would reject its own queries.
        if config.paging.default_page_size == 0
            || config.paging.default_page_size > config.paging.max_page_size
        {
            return Err(ConfigError::InvalidValue(
                "LEDGERBOOK_DEFAULT_PAGE_SIZE".to_string(),
            ));
        }

        Ok(config)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone()).max_connections(self.max_connections)
    }
}

fn parse_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u32,
) -> Result<u32, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_path, PathBuf::from("ledgerbook.db"));
        assert_eq!(config.paging, PagingLimits::default());
        assert_eq!(config.actor, "system");
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("LEDGERBOOK_DATABASE_PATH", "/tmp/books.db"),
            ("LEDGERBOOK_MAX_PAGE_SIZE", "50"),
            ("LEDGERBOOK_DEFAULT_PAGE_SIZE", "10"),
            ("LEDGERBOOK_ACTOR", "importer"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/books.db"));
        assert_eq!(config.paging.max_page_size, 50);
        assert_eq!(config.paging.default_page_size, 10);
        assert_eq!(config.actor, "importer");
        assert_eq!(config.db_config().database_path, PathBuf::from("/tmp/books.db"));
    }

    #[test]
    fn test_invalid_number_names_the_variable() {
        let err = ServiceConfig::from_lookup(lookup(&[("LEDGERBOOK_MAX_PAGE_SIZE", "lots")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for LEDGERBOOK_MAX_PAGE_SIZE");
    }

    #[test]
    fn test_default_page_size_cannot_exceed_max() {
        let result = ServiceConfig::from_lookup(lookup(&[
            ("LEDGERBOOK_DEFAULT_PAGE_SIZE", "200"),
            ("LEDGERBOOK_MAX_PAGE_SIZE", "100"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }
}
