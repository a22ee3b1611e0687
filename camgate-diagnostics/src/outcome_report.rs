//! Serialisable reports of classified outcomes
//!
//! A report flattens an [`Outcome`] into the fields worth shipping to a log
//! sink or an analytics endpoint. `Unknown` outcomes are marked as defects and
//! logged at error level.

use camgate_core::{
    CaptureErrorReason, CaptureOutcome, ClassificationGap, DenialReason, Outcome,
    PermissionState, RetryPolicy,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Flattened view of one classified outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeReport {
    /// `accepted`, `denied` or `unknown`
    pub kind: String,
    /// Reported permission state
    pub permission_state: PermissionState,
    /// Denial diagnosis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denied_by: Option<DenialReason>,
    /// Retry policy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryPolicy>,
    /// Mapped capture failure reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<CaptureErrorReason>,
    /// Rendered platform error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_error: Option<String>,
    /// Detected contradiction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<ClassificationGap>,
    /// Capture duration in milliseconds
    pub elapsed_ms: u64,
    /// Whether this outcome signals a classification defect
    pub defect: bool,
    /// When the report was built
    pub reported_at: DateTime<Utc>,
}

impl OutcomeReport {
    /// Build a report stamped with the current time
    pub fn from_outcome(outcome: &Outcome) -> Self {
        Self::at(outcome, Utc::now())
    }

    /// Build a report stamped with `reported_at`
    pub fn at(outcome: &Outcome, reported_at: DateTime<Utc>) -> Self {
        let (error_reason, original_error, gap) = match outcome {
            Outcome::Accepted { .. } => (None, None, None),
            Outcome::Denied { capture, .. } => (
                Some(capture.reason),
                Some(capture.original_error.clone()),
                None,
            ),
            Outcome::Unknown { capture, gap, .. } => match capture {
                CaptureOutcome::Failure(failure) => (
                    Some(failure.reason),
                    Some(failure.original_error.clone()),
                    Some(*gap),
                ),
                CaptureOutcome::Success(_) => (None, None, Some(*gap)),
            },
        };

        Self {
            kind: outcome.kind().to_string(),
            permission_state: outcome.permission_state(),
            denied_by: outcome.denied_by(),
            retry: outcome.retry(),
            error_reason,
            original_error,
            gap,
            elapsed_ms: outcome.elapsed().as_millis() as u64,
            defect: outcome.is_defect(),
            reported_at,
        }
    }

    /// Whether this outcome signals a classification defect
    pub fn is_defect(&self) -> bool {
        self.defect
    }

    /// Report as a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Log the report; defects at error level, denials at warn, the rest at info
    pub fn log(&self) {
        let payload = self.to_json().unwrap_or_else(|e| format!("<unserializable: {e}>"));
        if self.defect {
            error!(
                gap = ?self.gap,
                permission_state = %self.permission_state,
                "Camera outcome could not be classified: {}",
                payload
            );
        } else if self.kind == "denied" {
            warn!(
                denied_by = ?self.denied_by,
                retry = ?self.retry,
                elapsed_ms = self.elapsed_ms,
                "Camera access denied"
            );
        } else {
            info!(
                permission_state = %self.permission_state,
                elapsed_ms = self.elapsed_ms,
                "Camera access accepted"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camgate_core::{CaptureFailure, CaptureSuccess, StreamHandle};
    use chrono::TimeZone;
    use std::time::Duration;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().expect("valid date")
    }

    #[test]
    fn test_denied_report() {
        let outcome = Outcome::Denied {
            permission_state: PermissionState::Denied,
            denied_by: DenialReason::BrowserDenied,
            retry: RetryPolicy::NotRetryable,
            capture: CaptureFailure {
                reason: CaptureErrorReason::PermissionDenied,
                original_error: "NotAllowedError: Permission denied".to_string(),
                elapsed: Duration::from_millis(12),
            },
        };
        let report = OutcomeReport::at(&outcome, fixed_time());
        assert_eq!(report.kind, "denied");
        assert_eq!(report.elapsed_ms, 12);
        assert!(!report.is_defect());

        let json: serde_json::Value =
            serde_json::from_str(&report.to_json().expect("serialize")).expect("parse");
        assert_eq!(json["denied_by"], "BrowserDenied");
        assert_eq!(json["retry"], "NotRetryable");
        assert_eq!(json["error_reason"], "PermissionDenied");
        assert_eq!(json["reported_at"], "2024-03-01T12:00:00Z");
        assert!(json.get("gap").is_none());
    }

    #[test]
    fn test_unknown_is_defect() {
        let outcome = Outcome::Unknown {
            permission_state: PermissionState::Granted,
            capture: CaptureOutcome::Success(CaptureSuccess {
                stream: StreamHandle {
                    id: "s".to_string(),
                    tracks: Vec::new(),
                },
                devices: Vec::new(),
                elapsed: Duration::from_millis(90),
            }),
            gap: ClassificationGap::SuccessWithoutVideoTrack,
        };
        let report = OutcomeReport::from_outcome(&outcome);
        assert!(report.is_defect());
        assert_eq!(report.gap, Some(ClassificationGap::SuccessWithoutVideoTrack));
        assert_eq!(report.error_reason, None);
        report.log();
    }
}
