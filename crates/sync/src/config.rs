//! # Sync Configuration Module
//!
//! Loads the settings for a synchronization run from environment variables,
//! with defaults for everything except the remote endpoint, its credentials
//! and the database.
//!
//! ## Environment Variables
//!
//! - `SYNC_ENDPOINT`: Base URL of the remote doctor directory (required)
//! - `SYNC_USERNAME` / `SYNC_PASSWORD`: Basic-auth credentials (required)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `SYNC_MAX_ATTEMPTS`: Attempts per remote call (default: 3)
//! - `SYNC_RETRY_DELAY_MS`: Fixed delay between attempts (default: 1000)
//! - `SYNC_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `SYNC_STALE_AFTER_SECONDS`: Slot staleness threshold (default: 300)
//! - `SYNC_QUIET_DAY`: Day on which slot-fetch errors are not reported (default: "Sun")
//! - `SYNC_TIMEZONE`: Timezone the quiet day is evaluated in (default: "UTC")
//! - `SYNC_INTERVAL_SECONDS`: Repeat runs on this interval instead of running once
//! - `LOG_LEVEL`: Logging level (default: "info")

use std::env;
use std::fmt;
use std::time::Duration;

use chrono::Weekday;
use chrono_tz::Tz;
use doctor_sync_core::{
    alerts::QuietDayPolicy,
    freshness::{DEFAULT_STALE_AFTER_SECS, FreshnessPolicy},
};
use eyre::{Result, WrapErr, eyre};
use tracing::Level;

use crate::client::RetryPolicy;

/// Configuration for a synchronization run.
#[derive(Clone)]
pub struct SyncConfig {
    /// Base URL of the remote directory, without a trailing slash
    pub endpoint: String,

    pub username: String,

    pub password: String,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Attempts per remote call, including the first one
    pub max_attempts: u32,

    /// Fixed wait between attempts
    pub retry_delay: Duration,

    pub request_timeout: Duration,

    pub stale_after_secs: i64,

    pub quiet_day: Weekday,

    pub timezone: Tz,

    /// When set, runs repeat on this interval
    pub interval: Option<Duration>,

    /// Log level for the application
    pub log_level: Level,
}

impl SyncConfig {
    /// Creates a new SyncConfig from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| eyre!("{} environment variable must be set", key))
        };

        // Remote directory
        let endpoint = required("SYNC_ENDPOINT")?.trim_end_matches('/').to_string();
        let username = required("SYNC_USERNAME")?;
        let password = required("SYNC_PASSWORD")?;

        // Database settings
        let database_url = required("DATABASE_URL")?;

        // Retry settings
        let max_attempts: u32 = lookup("SYNC_MAX_ATTEMPTS")
            .unwrap_or_else(|| "3".to_string())
            .parse()
            .wrap_err("Invalid SYNC_MAX_ATTEMPTS value")?;
        if max_attempts == 0 {
            return Err(eyre!("SYNC_MAX_ATTEMPTS must be at least 1"));
        }

        let retry_delay_ms: u64 = lookup("SYNC_RETRY_DELAY_MS")
            .unwrap_or_else(|| "1000".to_string())
            .parse()
            .wrap_err("Invalid SYNC_RETRY_DELAY_MS value")?;

        let request_timeout_secs: u64 = lookup("SYNC_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .wrap_err("Invalid SYNC_REQUEST_TIMEOUT_SECONDS value")?;

        // Policies
        let stale_after_secs: i64 = match lookup("SYNC_STALE_AFTER_SECONDS") {
            Some(value) => value
                .parse()
                .wrap_err("Invalid SYNC_STALE_AFTER_SECONDS value")?,
            None => DEFAULT_STALE_AFTER_SECS,
        };

        let quiet_day: Weekday = lookup("SYNC_QUIET_DAY")
            .unwrap_or_else(|| "Sun".to_string())
            .parse()
            .map_err(|e| eyre!("Invalid SYNC_QUIET_DAY value: {:?}", e))?;

        let timezone: Tz = lookup("SYNC_TIMEZONE")
            .unwrap_or_else(|| "UTC".to_string())
            .parse()
            .map_err(|e| eyre!("Invalid SYNC_TIMEZONE value: {}", e))?;

        // Scheduling
        let interval = match lookup("SYNC_INTERVAL_SECONDS") {
            Some(value) => {
                let secs: u64 = value
                    .parse()
                    .wrap_err("Invalid SYNC_INTERVAL_SECONDS value")?;
                if secs == 0 {
                    return Err(eyre!("SYNC_INTERVAL_SECONDS must be at least 1"));
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        // Logging settings
        let log_level = match lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        Ok(Self {
            endpoint,
            username,
            password,
            database_url,
            max_attempts,
            retry_delay: Duration::from_millis(retry_delay_ms),
            request_timeout: Duration::from_secs(request_timeout_secs),
            stale_after_secs,
            quiet_day,
            timezone,
            interval,
            log_level,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay: self.retry_delay,
        }
    }

    pub fn freshness_policy(&self) -> FreshnessPolicy {
        FreshnessPolicy::new(self.stale_after_secs)
    }

    pub fn alert_policy(&self) -> QuietDayPolicy {
        QuietDayPolicy::new(self.quiet_day, self.timezone)
    }
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database_url", &"<redacted>")
            .field("max_attempts", &self.max_attempts)
            .field("retry_delay", &self.retry_delay)
            .field("request_timeout", &self.request_timeout)
            .field("stale_after_secs", &self.stale_after_secs)
            .field("quiet_day", &self.quiet_day)
            .field("timezone", &self.timezone)
            .field("interval", &self.interval)
            .field("log_level", &self.log_level)
            .finish()
    }
}
