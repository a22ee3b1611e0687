//! Error types for camgate

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for camgate core operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid configuration provided
    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfiguration {
        /// Offending configuration field
        field: String,
        /// Why the value was rejected
        reason: String,
    },
}

impl CoreError {
    /// Get error code for programmatic handling
    pub fn error_code(&self) -> String {
        match self {
            CoreError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION".to_string(),
        }
    }
}

/// A named error raised by a host platform binding.
///
/// Mirrors the shape of a host exception: an optional `name` (for example
/// `NotAllowedError`) and a free-form message. It never crosses the public
/// boundary of a capture cycle; capture failures are mapped to a
/// [`CaptureErrorReason`](crate::CaptureErrorReason) instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformError {
    /// Error name reported by the platform, if any
    pub name: Option<String>,
    /// Error message
    pub message: String,
}

impl PlatformError {
    /// Create a named platform error
    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: message.into(),
        }
    }

    /// Create a platform error without a name
    pub fn unnamed(message: impl Into<String>) -> Self {
        Self {
            name: None,
            message: message.into(),
        }
    }

    /// Error name, treating an empty name as absent
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    /// Render the error the way a host runtime stringifies it (`"Name: message"`).
    pub fn rendered(&self) -> String {
        self.to_string()
    }

    /// Text after the first `:` of the rendered form, trimmed.
    pub fn detail(&self) -> Option<String> {
        self.rendered()
            .split_once(':')
            .map(|(_, detail)| detail.trim().to_string())
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self.message.is_empty()) {
            (Some(name), false) => write!(f, "{}: {}", name, self.message),
            (Some(name), true) => f.write_str(name),
            (None, _) => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for PlatformError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_error_rendering() {
        let error = PlatformError::named("NotAllowedError", "Permission denied");
        assert_eq!(error.rendered(), "NotAllowedError: Permission denied");
        assert_eq!(error.detail().as_deref(), Some("Permission denied"));

        let bare = PlatformError::named("OverconstrainedError", "");
        assert_eq!(bare.rendered(), "OverconstrainedError");
        assert_eq!(bare.detail(), None);

        let unnamed = PlatformError::unnamed("something broke");
        assert_eq!(unnamed.rendered(), "something broke");
        assert_eq!(unnamed.name(), None);
    }

    #[test]
    fn test_empty_name_is_absent() {
        let error = PlatformError::named("", "Device in use");
        assert_eq!(error.name(), None);
        assert_eq!(error.rendered(), "Device in use");
    }

    #[test]
    fn test_error_code() {
        let error = CoreError::InvalidConfiguration {
            field: "browser_denied_threshold".to_string(),
            reason: "must be greater than zero".to_string(),
        };
        assert_eq!(error.error_code(), "INVALID_CONFIGURATION");
        assert_eq!(
            error.to_string(),
            "Invalid configuration: browser_denied_threshold - must be greater than zero"
        );
    }
}
