//! Capture results and classified outcomes

use crate::media::{MediaDeviceInfo, StreamHandle};
use crate::permission::{DenialReason, PermissionState};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Typed reason a capture attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureErrorReason {
    /// The permission was denied
    PermissionDenied,
    /// The permission prompt was dismissed
    PermissionDismissed,
    /// The camera is held by another process or could not be started
    InUse,
    /// No device satisfies the requested constraints
    Overconstrained,
    /// The request did not resolve within the configured timeout
    Timeout,
    /// Anything else
    Unknown,
}

impl CaptureErrorReason {
    /// Whether the reason describes a permission refusal
    pub fn is_permission_refusal(&self) -> bool {
        matches!(
            self,
            CaptureErrorReason::PermissionDenied | CaptureErrorReason::PermissionDismissed
        )
    }
}

/// A successful capture attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureSuccess {
    /// The acquired stream
    pub stream: StreamHandle,
    /// Video inputs enumerated right after acquisition; may be empty
    pub devices: Vec<MediaDeviceInfo>,
    /// Time from request to resolution
    pub elapsed: Duration,
}

/// A failed capture attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureFailure {
    /// Mapped failure reason
    pub reason: CaptureErrorReason,
    /// The platform error as rendered by the host
    pub original_error: String,
    /// Time from request to rejection
    pub elapsed: Duration,
}

/// Result of exactly one hardware access request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CaptureOutcome {
    /// The stream was acquired
    Success(CaptureSuccess),
    /// The request was rejected
    Failure(CaptureFailure),
}

impl CaptureOutcome {
    /// Time the request took, whichever way it resolved
    pub fn elapsed(&self) -> Duration {
        match self {
            CaptureOutcome::Success(success) => success.elapsed,
            CaptureOutcome::Failure(failure) => failure.elapsed,
        }
    }

    /// Whether the stream was acquired
    pub fn is_success(&self) -> bool {
        matches!(self, CaptureOutcome::Success(_))
    }
}

/// UI affordance that re-triggers a permission prompt after a reload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonKind {
    /// Only the browser's own site-permission button works
    BrowserButton,
    /// Any in-page button works
    AnyButton,
}

/// Whether and how a caller may re-attempt after a denial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// Terminal; the user has to change the setting outside the page
    NotRetryable,
    /// Asking again will show the prompt again
    RetryableNow,
    /// A prompt can be shown again after a reload
    RetryableAfterReload {
        /// Affordance to present
        button_kind: ButtonKind,
    },
    /// No reliable signal to decide
    Unknown,
}

impl RetryPolicy {
    /// Whether the caller can recover without leaving the page
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RetryPolicy::RetryableNow | RetryPolicy::RetryableAfterReload { .. }
        )
    }
}

/// Input combinations the engine recognises as contradictory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassificationGap {
    /// The platform reported success but handed back a stream without a video track
    SuccessWithoutVideoTrack,
}

impl ClassificationGap {
    /// Short description for logs
    pub fn description(&self) -> &'static str {
        match self {
            ClassificationGap::SuccessWithoutVideoTrack => {
                "capture reported success but the stream carries no video track"
            }
        }
    }
}

/// The engine's sole output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// Camera access was obtained
    Accepted {
        /// Permission state to report
        permission_state: PermissionState,
        /// The successful capture
        capture: CaptureSuccess,
    },
    /// Camera access was refused
    Denied {
        /// Permission state to report
        permission_state: PermissionState,
        /// Diagnosed source of the refusal
        denied_by: DenialReason,
        /// What the caller may do next
        retry: RetryPolicy,
        /// The failed capture
        capture: CaptureFailure,
    },
    /// Contradictory inputs; callers should log this as a defect
    Unknown {
        /// Permission state observed after the request
        permission_state: PermissionState,
        /// The capture as it was reported
        capture: CaptureOutcome,
        /// Which contradiction was detected
        gap: ClassificationGap,
    },
}

impl Outcome {
    /// Reported permission state
    pub fn permission_state(&self) -> PermissionState {
        match self {
            Outcome::Accepted {
                permission_state, ..
            }
            | Outcome::Denied {
                permission_state, ..
            }
            | Outcome::Unknown {
                permission_state, ..
            } => *permission_state,
        }
    }

    /// Whether camera access was obtained
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted { .. })
    }

    /// Denial diagnosis, if this is a denial
    pub fn denied_by(&self) -> Option<DenialReason> {
        match self {
            Outcome::Denied { denied_by, .. } => Some(*denied_by),
            _ => None,
        }
    }

    /// Retry policy, if this is a denial
    pub fn retry(&self) -> Option<RetryPolicy> {
        match self {
            Outcome::Denied { retry, .. } => Some(*retry),
            _ => None,
        }
    }

    /// Time the underlying capture attempt took
    pub fn elapsed(&self) -> Duration {
        match self {
            Outcome::Accepted { capture, .. } => capture.elapsed,
            Outcome::Denied { capture, .. } => capture.elapsed,
            Outcome::Unknown { capture, .. } => capture.elapsed(),
        }
    }

    /// Whether the outcome signals a classification defect
    pub fn is_defect(&self) -> bool {
        matches!(self, Outcome::Unknown { .. })
    }

    /// Short tag used in logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Accepted { .. } => "accepted",
            Outcome::Denied { .. } => "denied",
            Outcome::Unknown { .. } => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{MediaTrack, TrackKind};

    fn failure(reason: CaptureErrorReason, ms: u64) -> CaptureFailure {
        CaptureFailure {
            reason,
            original_error: String::new(),
            elapsed: Duration::from_millis(ms),
        }
    }

    #[test]
    fn test_retry_recoverability() {
        assert!(RetryPolicy::RetryableNow.is_recoverable());
        assert!(RetryPolicy::RetryableAfterReload {
            button_kind: ButtonKind::AnyButton
        }
        .is_recoverable());
        assert!(!RetryPolicy::NotRetryable.is_recoverable());
        assert!(!RetryPolicy::Unknown.is_recoverable());
    }

    #[test]
    fn test_outcome_accessors() {
        let denied = Outcome::Denied {
            permission_state: PermissionState::Prompt,
            denied_by: DenialReason::UserDenied,
            retry: RetryPolicy::RetryableNow,
            capture: failure(CaptureErrorReason::PermissionDenied, 900),
        };
        assert_eq!(denied.kind(), "denied");
        assert_eq!(denied.permission_state(), PermissionState::Prompt);
        assert_eq!(denied.denied_by(), Some(DenialReason::UserDenied));
        assert_eq!(denied.retry(), Some(RetryPolicy::RetryableNow));
        assert_eq!(denied.elapsed(), Duration::from_millis(900));
        assert!(!denied.is_accepted());
        assert!(!denied.is_defect());
    }

    #[test]
    fn test_capture_elapsed() {
        let success = CaptureOutcome::Success(CaptureSuccess {
            stream: StreamHandle {
                id: "stream-1".to_string(),
                tracks: vec![MediaTrack {
                    id: "track-1".to_string(),
                    kind: TrackKind::Video,
                    device_id: None,
                }],
            },
            devices: Vec::new(),
            elapsed: Duration::from_millis(42),
        });
        assert!(success.is_success());
        assert_eq!(success.elapsed(), Duration::from_millis(42));

        let failed = CaptureOutcome::Failure(failure(CaptureErrorReason::InUse, 7));
        assert!(!failed.is_success());
        assert_eq!(failed.elapsed(), Duration::from_millis(7));
    }

    #[test]
    fn test_permission_refusal_reasons() {
        assert!(CaptureErrorReason::PermissionDenied.is_permission_refusal());
        assert!(CaptureErrorReason::PermissionDismissed.is_permission_refusal());
        assert!(!CaptureErrorReason::InUse.is_permission_refusal());
        assert!(!CaptureErrorReason::Timeout.is_permission_refusal());
    }
}
