//! Outcome classification engine
//!
//! Turns the permission state seen before a request, the capture result, the
//! permission state seen after it and the memory of the previous attempt into
//! exactly one [`Outcome`]. The decision table papers over browsers that
//! misreport their own permission state; see [`classify`] for the rules.

use crate::browser::BrowserFamilyTable;
use crate::error::CoreError;
use crate::outcome::{
    ButtonKind, CaptureErrorReason, CaptureFailure, CaptureOutcome, CaptureSuccess,
    ClassificationGap, Outcome, RetryPolicy,
};
use crate::permission::{
    diagnose_denial, DenialReason, PermissionState, DEFAULT_BROWSER_DENIED_THRESHOLD,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// What the engine remembers about its most recent classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastAttemptMemory {
    /// How long the capture took
    pub elapsed: Duration,
    /// Permission state observed after the request
    pub post_state: PermissionState,
    /// Denial diagnosis, if the attempt was denied
    pub denied_by: Option<DenialReason>,
}

impl LastAttemptMemory {
    /// Memory of a classification that produced `outcome` after observing `post_state`
    pub fn record(post_state: PermissionState, outcome: &Outcome) -> Self {
        Self {
            elapsed: outcome.elapsed(),
            post_state,
            denied_by: outcome.denied_by(),
        }
    }

    /// An instant browser-level denial that left the platform claiming it would prompt again
    fn was_instant_denial_claiming_prompt(&self, threshold: Duration) -> bool {
        self.denied_by == Some(DenialReason::BrowserDenied)
            && self.elapsed <= threshold
            && self.post_state == PermissionState::Prompt
    }
}

/// Per-call parameters of the decision table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationPolicy {
    /// Latency at or below which a failure is a browser-level denial
    pub browser_denied_threshold: Duration,
    /// Reload affordance for the current browser
    pub reload_button: ButtonKind,
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self {
            browser_denied_threshold: DEFAULT_BROWSER_DENIED_THRESHOLD,
            reload_button: ButtonKind::AnyButton,
        }
    }
}

/// Classify one capture cycle.
///
/// Pure: identical inputs and history always produce identical outcomes.
///
/// * `Denied` before the request: a failure is a non-retryable browser denial;
///   a success means the state read was stale and is accepted.
/// * `Granted` before the request: a failure means the hardware is busy, so the
///   reason becomes [`CaptureErrorReason::InUse`] and retry is unknown.
/// * `Prompt` before the request, in order: a post-request `Denied` is final;
///   a second instant denial while the platform keeps claiming `Prompt` is
///   final too; an instant denial is retryable after reload; a slow one is
///   retryable now.
/// * `ProbeError` before the request: outcomes are tagged `ProbeError` and
///   denials carry an unknown retry policy.
///
/// A success whose stream carries no video track is contradictory and yields
/// [`Outcome::Unknown`].
pub fn classify(
    pre: PermissionState,
    capture: CaptureOutcome,
    post: PermissionState,
    history: Option<&LastAttemptMemory>,
    policy: &ClassificationPolicy,
) -> Outcome {
    let failure = match capture {
        CaptureOutcome::Success(success) => return accept(pre, post, success),
        CaptureOutcome::Failure(failure) => failure,
    };

    let threshold = policy.browser_denied_threshold;
    let diagnosed = diagnose_denial(failure.elapsed, threshold);

    match pre {
        PermissionState::Denied => deny(
            PermissionState::Denied,
            DenialReason::BrowserDenied,
            RetryPolicy::NotRetryable,
            failure,
        ),
        PermissionState::Granted => {
            let failure = CaptureFailure {
                reason: CaptureErrorReason::InUse,
                ..failure
            };
            deny(post, diagnosed, RetryPolicy::Unknown, failure)
        }
        PermissionState::Prompt => {
            if post == PermissionState::Denied {
                return deny(
                    PermissionState::Denied,
                    diagnosed,
                    RetryPolicy::NotRetryable,
                    failure,
                );
            }

            let repeated_instant_denial = diagnosed == DenialReason::BrowserDenied
                && history.is_some_and(|h| h.was_instant_denial_claiming_prompt(threshold));
            if repeated_instant_denial {
                debug!(
                    elapsed_ms = failure.elapsed.as_millis() as u64,
                    "Second instant denial while platform still reports prompt; treating as final"
                );
                return deny(
                    PermissionState::Denied,
                    DenialReason::BrowserDenied,
                    RetryPolicy::NotRetryable,
                    failure,
                );
            }

            match diagnosed {
                DenialReason::BrowserDenied => deny(
                    post,
                    DenialReason::BrowserDenied,
                    RetryPolicy::RetryableAfterReload {
                        button_kind: policy.reload_button,
                    },
                    failure,
                ),
                DenialReason::UserDenied => deny(
                    post,
                    DenialReason::UserDenied,
                    RetryPolicy::RetryableNow,
                    failure,
                ),
            }
        }
        PermissionState::ProbeError => deny(
            PermissionState::ProbeError,
            diagnosed,
            RetryPolicy::Unknown,
            failure,
        ),
    }
}

fn accept(pre: PermissionState, post: PermissionState, capture: CaptureSuccess) -> Outcome {
    let permission_state = match pre {
        PermissionState::Granted => PermissionState::Granted,
        PermissionState::ProbeError => PermissionState::ProbeError,
        PermissionState::Denied | PermissionState::Prompt => post,
    };

    if !capture.stream.has_video() {
        let gap = ClassificationGap::SuccessWithoutVideoTrack;
        warn!(stream_id = %capture.stream.id, "{}", gap.description());
        return Outcome::Unknown {
            permission_state,
            capture: CaptureOutcome::Success(capture),
            gap,
        };
    }

    Outcome::Accepted {
        permission_state,
        capture,
    }
}

fn deny(
    permission_state: PermissionState,
    denied_by: DenialReason,
    retry: RetryPolicy,
    capture: CaptureFailure,
) -> Outcome {
    Outcome::Denied {
        permission_state,
        denied_by,
        retry,
        capture,
    }
}

/// Stateful wrapper around [`classify`] owning the last-attempt memory of one session.
///
/// Independent camera sessions should each own their own engine.
#[derive(Debug, Clone)]
pub struct ClassificationEngine {
    browser_denied_threshold: Duration,
    families: BrowserFamilyTable,
    last_attempt: Option<LastAttemptMemory>,
}

impl Default for ClassificationEngine {
    fn default() -> Self {
        Self {
            browser_denied_threshold: DEFAULT_BROWSER_DENIED_THRESHOLD,
            families: BrowserFamilyTable::default(),
            last_attempt: None,
        }
    }
}

impl ClassificationEngine {
    /// Create an engine with an empty memory
    pub fn new(
        browser_denied_threshold: Duration,
        families: BrowserFamilyTable,
    ) -> Result<Self, CoreError> {
        if browser_denied_threshold.is_zero() {
            return Err(CoreError::InvalidConfiguration {
                field: "browser_denied_threshold".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(Self {
            browser_denied_threshold,
            families,
            last_attempt: None,
        })
    }

    /// Policy to apply for a browser identified by `user_agent`
    pub fn policy_for(&self, user_agent: &str) -> ClassificationPolicy {
        let resolution = self.families.resolve(user_agent);
        debug!(
            family = resolution.family.as_deref().unwrap_or("any"),
            button_kind = ?resolution.button_kind,
            "Resolved reload button"
        );
        ClassificationPolicy {
            browser_denied_threshold: self.browser_denied_threshold,
            reload_button: resolution.button_kind,
        }
    }

    /// Classify a cycle and remember it for the next call
    pub fn classify(
        &mut self,
        pre: PermissionState,
        capture: CaptureOutcome,
        post: PermissionState,
        user_agent: &str,
    ) -> Outcome {
        let policy = self.policy_for(user_agent);
        let outcome = classify(pre, capture, post, self.last_attempt.as_ref(), &policy);
        self.last_attempt = Some(LastAttemptMemory::record(post, &outcome));
        debug!(
            %pre,
            %post,
            outcome = outcome.kind(),
            elapsed_ms = outcome.elapsed().as_millis() as u64,
            "Classified capture cycle"
        );
        outcome
    }

    /// Memory of the most recent classification
    pub fn last_attempt(&self) -> Option<&LastAttemptMemory> {
        self.last_attempt.as_ref()
    }

    /// Forget the most recent classification
    pub fn reset(&mut self) {
        self.last_attempt = None;
    }

    /// Configured denial threshold
    pub fn browser_denied_threshold(&self) -> Duration {
        self.browser_denied_threshold
    }
}
