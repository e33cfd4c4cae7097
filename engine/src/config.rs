//! Configuration for the order list.
//!
//! Defaults match the dashboard: 10 rows per page, a 500 ms artificial load
//! delay outside production, derived select-all with pruning. Every field can
//! be overridden from the environment:
//!
//! | variable | meaning |
//! |---|---|
//! | `ORDERLIST_ENV` | `development` (default) or `production`; production drops the load delay |
//! | `ORDERLIST_PAGE_SIZE` | rows per page, > 0 |
//! | `ORDERLIST_LOAD_DELAY_MS` | artificial load delay; wins over `ORDERLIST_ENV` |
//! | `ORDERLIST_SELECT_ALL` | `tracked` or `derived` |
//! | `ORDERLIST_SELECTION` | `retain` or `prune` |
//! | `ORDERLIST_DATA` | JSON file to load instead of the bundled fixture |
//! | `ORDERLIST_UTC_OFFSET_MINUTES` | calendar offset for "today"; default is the system offset at that instant |

use crate::query::DEFAULT_PAGE_SIZE;
use crate::selection::{SelectAllMode, SelectionPolicy, SelectionRetention};
use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Artificial latency on every load outside production
pub const DEFAULT_LOAD_DELAY: Duration = Duration::from_millis(500);

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable held a value that could not be parsed
    #[error("invalid value for {var}: {message}")]
    Invalid {
        /// Variable name
        var: &'static str,
        /// What was wrong
        message: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, message: impl ToString) -> Self {
        Self::Invalid {
            var,
            message: message.to_string(),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("expected development|production, got `{other}`")),
        }
    }
}

/// Order list settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderListConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Rows per page
    pub page_size: NonZeroUsize,
    /// Artificial latency before each load
    pub load_delay: Duration,
    /// Selection behaviour
    pub selection: SelectionPolicy,
    /// File to load instead of the bundled fixture
    pub data_path: Option<PathBuf>,
    /// Calendar offset for "today"; `None` uses the system offset
    pub utc_offset: Option<FixedOffset>,
}

impl Default for OrderListConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            page_size: DEFAULT_PAGE_SIZE,
            load_delay: DEFAULT_LOAD_DELAY,
            selection: SelectionPolicy::default(),
            data_path: None,
            utc_offset: None,
        }
    }
}

impl OrderListConfig {
    /// Defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the deployment environment; production drops the load delay
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        if environment == Environment::Production {
            self.load_delay = Duration::ZERO;
        }
        self
    }

    /// Set rows per page
    #[must_use]
    pub const fn with_page_size(mut self, page_size: NonZeroUsize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the artificial load delay
    #[must_use]
    pub const fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    /// Set the selection policy
    #[must_use]
    pub const fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.selection = selection;
        self
    }

    /// Load from a JSON file instead of the bundled fixture
    #[must_use]
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Fix the calendar offset used for "today"
    #[must_use]
    pub const fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = Some(offset);
        self
    }

    /// Calendar offset in effect at `instant`
    ///
    /// Without a configured offset this is the system offset at that instant,
    /// so daylight-saving changes are picked up by long-running processes.
    #[must_use]
    pub fn utc_offset_at(&self, instant: DateTime<Utc>) -> FixedOffset {
        self.utc_offset
            .unwrap_or_else(|| *instant.with_timezone(&Local).offset())
    }

    /// Read configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("ORDERLIST_ENV") {
            let environment = raw
                .parse::<Environment>()
                .map_err(|e| ConfigError::invalid("ORDERLIST_ENV", e))?;
            config = config.with_environment(environment);
        }

        if let Some(raw) = lookup("ORDERLIST_PAGE_SIZE") {
            let size = raw
                .trim()
                .parse::<NonZeroUsize>()
                .map_err(|e| ConfigError::invalid("ORDERLIST_PAGE_SIZE", e))?;
            config.page_size = size;
        }

        if let Some(raw) = lookup("ORDERLIST_LOAD_DELAY_MS") {
            let millis = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::invalid("ORDERLIST_LOAD_DELAY_MS", e))?;
            config.load_delay = Duration::from_millis(millis);
        }

        if let Some(raw) = lookup("ORDERLIST_SELECT_ALL") {
            config.selection.select_all = raw
                .parse::<SelectAllMode>()
                .map_err(|e| ConfigError::invalid("ORDERLIST_SELECT_ALL", e))?;
        }

        if let Some(raw) = lookup("ORDERLIST_SELECTION") {
            config.selection.retention = raw
                .parse::<SelectionRetention>()
                .map_err(|e| ConfigError::invalid("ORDERLIST_SELECTION", e))?;
        }

        if let Some(raw) = lookup("ORDERLIST_DATA") {
            if !raw.trim().is_empty() {
                config.data_path = Some(PathBuf::from(raw));
            }
        }

        if let Some(raw) = lookup("ORDERLIST_UTC_OFFSET_MINUTES") {
            let minutes = raw
                .trim()
                .parse::<i32>()
                .map_err(|e| ConfigError::invalid("ORDERLIST_UTC_OFFSET_MINUTES", e))?;
            let offset = minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| {
                    ConfigError::invalid("ORDERLIST_UTC_OFFSET_MINUTES", "offset out of range")
                })?;
            config.utc_offset = Some(offset);
        }

        Ok(config)
    }
}
