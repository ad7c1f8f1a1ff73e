//! Helpers for loading service configuration from environment variables.

use std::str::FromStr;

/// Deployment environment, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Anything other than `production` (case-insensitive) is development.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub fn from_env() -> Self {
        std::env::var("APP_ENV")
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Read a required variable.
///
/// # Panics
///
/// Panics if the variable is missing; configuration errors are fatal at startup.
pub fn require(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| panic!("missing required env var {key}"))
}

/// Read an optional variable, treating an empty value as absent.
pub fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Read and parse a variable, falling back to `default` when absent or unparsable.
pub fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
