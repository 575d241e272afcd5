//! Store configuration
//!
//! Built once at process start and passed by reference; a missing required
//! value fails construction instead of surfacing lazily on first use.

use stepnote_core::ConfigError;
use std::str::FromStr;
use std::time::Duration;

/// Which backend variant the store talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Plain CRM notes attached to a fixed contact.
    Notes,
    /// CRM custom-object records.
    CustomObjects,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "notes" => Ok(BackendKind::Notes),
            "custom_objects" => Ok(BackendKind::CustomObjects),
            _ => Err(ConfigError::InvalidValue {
                field: "STEPNOTE_BACKEND",
                value: s.to_string(),
                reason: "expected notes or custom_objects".to_string(),
            }),
        }
    }
}

/// Retry policy for transient store failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts per logical request, including the first.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(8),
        }
    }
}

impl RetryConfig {
    /// Exponential backoff delay before the given retry (1-based), capped.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Store connection configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// CRM API base URL, no trailing slash.
    pub base_url: String,
    pub access_token: String,
    /// Contact whose notes hold every stepnote document.
    pub contact_id: i64,
    pub backend: BackendKind,
    /// Listing page bound. One page per list call; completeness of the
    /// virtual collections is bounded by this value.
    pub page_size: u32,
    pub retry: RetryConfig,
}

impl StoreConfig {
    /// Load configuration from the environment.
    ///
    /// Environment variables:
    /// - `STEPNOTE_ACCESS_TOKEN`: CRM bearer token (required)
    /// - `STEPNOTE_CONTACT_ID`: contact holding the note documents (required)
    /// - `STEPNOTE_BASE_URL`: API base URL (default: `https://api.getbase.com`)
    /// - `STEPNOTE_BACKEND`: `notes` or `custom_objects` (default: `notes`)
    /// - `STEPNOTE_PAGE_SIZE`: listing page bound (default: 100)
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_token = require_env("STEPNOTE_ACCESS_TOKEN")?;
        let contact_raw = require_env("STEPNOTE_CONTACT_ID")?;
        let contact_id = parse_env("STEPNOTE_CONTACT_ID", contact_raw)?;
        let base_url = std::env::var("STEPNOTE_BASE_URL")
            .unwrap_or_else(|_| "https://api.getbase.com".to_string())
            .trim_end_matches('/')
            .to_string();
        let backend = match std::env::var("STEPNOTE_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) => BackendKind::Notes,
        };
        let page_size = match std::env::var("STEPNOTE_PAGE_SIZE") {
            Ok(raw) => parse_env("STEPNOTE_PAGE_SIZE", raw)?,
            Err(_) => 100,
        };

        Ok(Self {
            base_url,
            access_token,
            contact_id,
            backend,
            page_size,
            retry: RetryConfig::default(),
        })
    }
}

fn require_env(field: &'static str) -> Result<String, ConfigError> {
    match std::env::var(field) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingRequired { field }),
    }
}

fn parse_env<T: FromStr>(field: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field,
        value: raw,
        reason: "not a number".to_string(),
    })
}
