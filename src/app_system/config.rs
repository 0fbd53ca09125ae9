use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::store::{OrderNumbering, StoreConfig};

/// Runtime configuration.
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | ORDER_BUFFER_SIZE | 32 | mailbox size of every actor |
/// | REQUEST_TIMEOUT_MS | 5000 | how long a client waits for the store |
/// | ORDER_NUMBERING | dense | `dense` (max + 1) or `sequence` (never reused) |
/// | DATA_FILE | unset | JSON snapshot path; unset keeps everything in memory |
/// | LOG_FILTER | info | tracing filter used when `RUST_LOG` is unset |
///
/// Values that fail to parse fall back to their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub buffer_size: usize,
    pub request_timeout: Duration,
    pub numbering: OrderNumbering,
    pub data_file: Option<PathBuf>,
    pub log_filter: String,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary lookup, used by tests.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            buffer_size: parse_or(&get, "ORDER_BUFFER_SIZE", defaults.buffer_size),
            request_timeout: get("REQUEST_TIMEOUT_MS")
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
            numbering: parse_or(&get, "ORDER_NUMBERING", defaults.numbering),
            data_file: get("DATA_FILE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            log_filter: get("LOG_FILTER").unwrap_or(defaults.log_filter),
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            numbering: self.numbering,
            data_file: self.data_file.clone(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            buffer_size: 32,
            request_timeout: Duration::from_millis(5000),
            numbering: OrderNumbering::Dense,
            data_file: None,
            log_filter: "info".to_string(),
        }
    }
}

fn parse_or<T: FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    get(key).and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
