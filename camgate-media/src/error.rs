//! Media bookkeeping error types
//!
//! Errors raised by the device/stream registry and by platform calls that are
//! not part of a capture cycle. Capture failures themselves are never errors;
//! they are typed [`CaptureErrorReason`](camgate_core::CaptureErrorReason)s.

use camgate_core::PlatformError;
use thiserror::Error;

/// Main error type for media bookkeeping operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// No registered stream has this identifier
    #[error("Stream not found: {stream_id}")]
    StreamNotFound {
        /// Stream identifier
        stream_id: String,
    },

    /// The stream exists but does not carry this track
    #[error("Track {track_id} not found on stream {stream_id}")]
    TrackNotFound {
        /// Stream identifier
        stream_id: String,
        /// Track identifier
        track_id: String,
    },

    /// A platform call failed
    #[error("Platform call {operation} failed: {source}")]
    Platform {
        /// Operation that failed
        operation: String,
        /// Error raised by the platform
        #[source]
        source: PlatformError,
    },
}

/// Result type alias for media operations
pub type MediaResult<T> = Result<T, MediaError>;

impl MediaError {
    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            MediaError::StreamNotFound { .. } => false,
            MediaError::TrackNotFound { .. } => false,
            MediaError::Platform { .. } => true,
        }
    }

    /// Get error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            MediaError::StreamNotFound { .. } => ErrorCategory::NotFound,
            MediaError::TrackNotFound { .. } => ErrorCategory::NotFound,
            MediaError::Platform { .. } => ErrorCategory::Platform,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Unknown stream or track
    NotFound,
    /// Host platform failures
    Platform,
}

/// Helper trait for attaching the failed operation to a platform error
pub trait IntoMediaError {
    /// Wrap `self` as a [`MediaError::Platform`] for `operation`
    fn into_media_error(self, operation: &str) -> MediaError;
}

impl IntoMediaError for PlatformError {
    fn into_media_error(self, operation: &str) -> MediaError {
        MediaError::Platform {
            operation: operation.to_string(),
            source: self,
        }
    }
}
