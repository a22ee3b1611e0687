//! Structured debug logging system

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Default filter directive when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "camgate=info,camgate_core=info,camgate_media=info";

/// Errors raised while installing the global subscriber
#[derive(Error, Debug)]
pub enum DiagnosticsError {
    /// The filter directive could not be parsed
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter {
        /// Directive that failed to parse
        directive: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Debug logger for structured logging
#[derive(Debug, Clone)]
pub struct DebugLogger {
    default_filter: String,
}

impl DebugLogger {
    /// Create new debug logger with the crate default filter
    pub fn new() -> Self {
        Self {
            default_filter: DEFAULT_FILTER.to_string(),
        }
    }

    /// Use `directive` when `RUST_LOG` is unset
    pub fn with_default_filter(mut self, directive: impl Into<String>) -> Self {
        self.default_filter = directive.into();
        self
    }

    /// Filter directive used when `RUST_LOG` is unset
    pub fn default_filter(&self) -> &str {
        &self.default_filter
    }

    /// Build the filter: `RUST_LOG` wins, otherwise the default directive
    pub fn env_filter(&self) -> Result<EnvFilter, DiagnosticsError> {
        match std::env::var(EnvFilter::DEFAULT_ENV) {
            Ok(directive) if !directive.trim().is_empty() => parse_filter(&directive),
            _ => parse_filter(&self.default_filter),
        }
    }

    /// Install the global fmt subscriber, failing if one is already set
    pub fn try_init(&self) -> Result<(), DiagnosticsError> {
        let filter = self.env_filter()?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .map_err(|e| DiagnosticsError::AlreadyInitialized(e.to_string()))
    }

    /// Initialize logging with `default_filter`, ignoring an existing subscriber
    pub fn init_logging(default_filter: &str) -> Result<(), DiagnosticsError> {
        match Self::try_init_logging(default_filter) {
            Err(DiagnosticsError::AlreadyInitialized(_)) => Ok(()),
            other => other,
        }
    }

    /// Initialize logging with `default_filter`
    pub fn try_init_logging(default_filter: &str) -> Result<(), DiagnosticsError> {
        Self::new().with_default_filter(default_filter).try_init()
    }
}

impl Default for DebugLogger {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_filter(directive: &str) -> Result<EnvFilter, DiagnosticsError> {
    EnvFilter::try_new(directive).map_err(|e| DiagnosticsError::InvalidFilter {
        directive: directive.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(parse_filter(DEFAULT_FILTER).is_ok());
        assert_eq!(DebugLogger::default().default_filter(), DEFAULT_FILTER);
    }

    #[test]
    fn test_invalid_filter_rejected() {
        let error = parse_filter("camgate=loud").expect_err("bad level");
        assert!(matches!(error, DiagnosticsError::InvalidFilter { .. }));
    }

    #[test]
    fn test_second_init_is_tolerated() {
        let _ = DebugLogger::try_init_logging("warn");
        assert!(DebugLogger::init_logging("warn").is_ok());
        assert!(matches!(
            DebugLogger::try_init_logging("warn"),
            Err(DiagnosticsError::AlreadyInitialized(_))
        ));
    }
}
