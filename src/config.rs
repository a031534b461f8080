//! Connection and retention configuration
//!
//! Everything is read once at startup by [`ArchiverConfig::from_env`]
//! and passed by reference to the components that need it.

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

/// How the TCP stream is secured before LOGIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Security {
    /// TLS from the first byte (IMAPS, usually port 993).
    Tls,
    /// Plain connection upgraded with STARTTLS (usually port 143).
    StartTls,
}

impl FromStr for Security {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tls" | "ssl" | "imaps" => Ok(Self::Tls),
            "starttls" => Ok(Self::StartTls),
            other => Err(Error::Config(format!(
                "Invalid IMAP_SECURITY '{other}' (expected tls or starttls)"
            ))),
        }
    }
}

/// IMAP connection configuration
#[derive(Debug, Clone)]
pub struct ImapConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub security: Security,
    /// Skip certificate verification (self-signed bridges).
    pub accept_invalid_certs: bool,
}

impl ImapConfig {
    /// Load IMAP configuration from environment variables.
    ///
    /// Credentials may be absent here so that a simulated run can start
    /// without them; [`ImapConfig::validate`] is checked before any
    /// live connection is attempted.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            host: env::var("IMAP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("IMAP_PORT", 993)?,
            username: env::var("IMAP_USERNAME").unwrap_or_default(),
            password: env::var("IMAP_PASSWORD").unwrap_or_default(),
            security: parse_var("IMAP_SECURITY", Security::Tls)?,
            accept_invalid_certs: parse_flag("IMAP_ACCEPT_INVALID_CERTS")?,
        })
    }

    /// Check that everything a live LOGIN needs is present.
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(Error::Config("IMAP_USERNAME not set".into()));
        }
        if self.password.is_empty() {
            return Err(Error::Config("IMAP_PASSWORD not set".into()));
        }
        Ok(())
    }

    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Folder names and age thresholds for the retention rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Source folder of the inbox rule.
    pub inbox: String,
    /// Destination of the inbox rule and source of the archive rule.
    pub archive: String,
    /// Prefix of the yearly buckets (`<base><delimiter><YYYY>`).
    pub base_archive_path: String,
    /// Delimiter that wins over whatever the server reports.
    pub force_delimiter: Option<String>,
    /// Delimiter used when no catalog entry identifies one.
    pub default_delimiter: String,
    pub inbox_max_age_days: u32,
    pub archive_max_age_days: u32,
    /// Keep this many calendar years of buckets; `None` disables pruning.
    pub keep_years: Option<u32>,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            inbox: "INBOX".to_string(),
            archive: "Archive".to_string(),
            base_archive_path: "Archive".to_string(),
            force_delimiter: None,
            default_delimiter: "/".to_string(),
            inbox_max_age_days: 365,
            archive_max_age_days: 730,
            keep_years: Some(30),
        }
    }
}

impl RetentionPolicy {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let keep_years = match parse_var("ARCHIVE_KEEP_YEARS", 30_u32)? {
            0 => None,
            years => Some(years),
        };

        Ok(Self {
            inbox: env::var("ARCHIVE_INBOX_FOLDER").unwrap_or(defaults.inbox),
            archive: env::var("ARCHIVE_FOLDER").unwrap_or(defaults.archive),
            base_archive_path: env::var("ARCHIVE_BASE_PATH")
                .unwrap_or(defaults.base_archive_path),
            force_delimiter: env::var("ARCHIVE_FORCE_DELIMITER")
                .ok()
                .filter(|d| !d.is_empty()),
            default_delimiter: env::var("ARCHIVE_DEFAULT_DELIMITER")
                .ok()
                .filter(|d| !d.is_empty())
                .unwrap_or(defaults.default_delimiter),
            inbox_max_age_days: parse_age("ARCHIVE_INBOX_MAX_AGE_DAYS", defaults.inbox_max_age_days)?,
            archive_max_age_days: parse_age("ARCHIVE_MAX_AGE_DAYS", defaults.archive_max_age_days)?,
            keep_years,
        })
    }

    /// Buckets whose year is strictly below this are pruned.
    #[must_use]
    pub fn prune_before_year(&self, current_year: i32) -> Option<i32> {
        self.keep_years
            .map(|keep| current_year - i32::try_from(keep).unwrap_or(i32::MAX))
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct ArchiverConfig {
    pub imap: ImapConfig,
    pub policy: RetentionPolicy,
    pub connect_retry: RetryPolicy,
}

impl ArchiverConfig {
    /// Load the full configuration from the environment (and `.env`).
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            imap: ImapConfig::from_env()?,
            policy: RetentionPolicy::from_env()?,
            connect_retry: RetryPolicy {
                max_attempts: parse_var("IMAP_CONNECT_ATTEMPTS", 3)?,
                initial_backoff: Duration::from_millis(parse_var(
                    "IMAP_CONNECT_BACKOFF_MS",
                    500,
                )?),
            },
        })
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid {key}: {e}"))),
        _ => Ok(default),
    }
}

/// Longest accepted age, about 100,000 years. Anything beyond cannot be
/// subtracted from the current date.
const MAX_AGE_DAYS: u32 = 36_500_000;

fn parse_age(key: &str, default: u32) -> Result<u32> {
    check_age(key, parse_var(key, default)?)
}

fn check_age(key: &str, days: u32) -> Result<u32> {
    if days > MAX_AGE_DAYS {
        return Err(Error::Config(format!(
            "Invalid {key}: {days} days exceeds {MAX_AGE_DAYS}"
        )));
    }
    Ok(days)
}

fn parse_flag(key: &str) -> Result<bool> {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "" | "0" | "false" | "no" | "off" => Ok(false),
            other => Err(Error::Config(format!("Invalid {key}: {other}"))),
        },
        Err(_) => Ok(false),
    }
}
