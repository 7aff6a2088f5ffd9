//! Server configuration read from the environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use storyreel_narrative::domain::resolver::PlaybackTiming;
use storyreel_navigation::domain::viewport::Viewport;
use storyreel_session::domain::state::DEFAULT_COUNTER;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_URL: &str = "sqlite://storyreel.db?mode=rwc";
const DEFAULT_VIEWPORT_WIDTH: f64 = 390.0;
const DEFAULT_VIEWPORT_HEIGHT: f64 = 844.0;

/// Everything the server binary needs at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// YAML or JSON catalog; the built-in story when `None`.
    pub catalog_path: Option<PathBuf>,
    /// Refuse to start when the catalog has dangling references.
    pub strict_catalog: bool,
    pub counter_default: i64,
    pub viewport: Viewport,
    pub timing: PlaybackTiming,
}

impl ServerConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_lookup`].
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, applying defaults for unset
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but cannot be parsed,
    /// or the viewport is not positive.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = PlaybackTiming::default();
        let width = parse_or(&lookup, "VIEWPORT_WIDTH", DEFAULT_VIEWPORT_WIDTH)?;
        let height = parse_or(&lookup, "VIEWPORT_HEIGHT", DEFAULT_VIEWPORT_HEIGHT)?;
        let viewport = Viewport::new(width, height)
            .map_err(|e| AppError::Config(format!("VIEWPORT_WIDTH/VIEWPORT_HEIGHT: {e}")))?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned()),
            catalog_path: lookup("CATALOG_PATH")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            strict_catalog: parse_or(&lookup, "STRICT_CATALOG", false)?,
            counter_default: parse_or(&lookup, "COUNTER_DEFAULT", DEFAULT_COUNTER)?,
            viewport,
            timing: PlaybackTiming {
                choice_delay: millis_or(&lookup, "CHOICE_DELAY_MS", defaults.choice_delay)?,
                step_delay: millis_or(&lookup, "STEP_DELAY_MS", defaults.step_delay)?,
                settle_delay: millis_or(&lookup, "SETTLE_DELAY_MS", defaults.settle_delay)?,
            },
        })
    }

    /// `host:port` as given.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} must be a valid value: {e}"))),
    }
}

fn millis_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration, AppError> {
    match lookup(key) {
        None => Ok(default),
        Some(_) => parse_or(lookup, key, 0_u64).map(Duration::from_millis),
    }
}
