//! Camera permission states and the denial-reason heuristic

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Failures at or below this latency are attributed to the browser rather than a person.
///
/// Nobody can read and dismiss a permission prompt this quickly, so a failure
/// inside the window means no prompt was shown at all.
pub const DEFAULT_BROWSER_DENIED_THRESHOLD: Duration = Duration::from_millis(200);

/// The three states a platform permission query can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NativePermissionState {
    /// Requests will be granted without a prompt
    Granted,
    /// Requests will be refused without a prompt
    Denied,
    /// Requests will prompt the user
    Prompt,
}

/// Camera permission as last observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionState {
    /// Camera access is granted
    Granted,
    /// Camera access is denied
    Denied,
    /// The platform will prompt on the next request
    Prompt,
    /// The permission query itself failed
    ProbeError,
}

impl PermissionState {
    /// Human-readable explanation of what the state means for the next request
    pub fn description(&self) -> &'static str {
        match self {
            PermissionState::Granted => "Requests for camera access will be granted immediately",
            PermissionState::Denied => "Requests will be denied immediately",
            PermissionState::Prompt => {
                "Requests will trigger a prompt to the user. The users input decides if access is allowed or not"
            }
            PermissionState::ProbeError => "The camera permission state could not be queried",
        }
    }
}

impl From<NativePermissionState> for PermissionState {
    fn from(state: NativePermissionState) -> Self {
        match state {
            NativePermissionState::Granted => PermissionState::Granted,
            NativePermissionState::Denied => PermissionState::Denied,
            NativePermissionState::Prompt => PermissionState::Prompt,
        }
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
            PermissionState::Prompt => "prompt",
            PermissionState::ProbeError => "probe-error",
        };
        f.write_str(name)
    }
}

/// A permission state together with a human-readable detail line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSnapshot {
    /// Observed state
    pub state: PermissionState,
    /// What the state means, or the rendered probe error
    pub detail: String,
}

impl PermissionSnapshot {
    /// Snapshot for a state the platform reported
    pub fn observed(state: NativePermissionState) -> Self {
        let state = PermissionState::from(state);
        Self {
            state,
            detail: state.description().to_string(),
        }
    }

    /// Snapshot for a failed probe
    pub fn probe_failed(detail: impl Into<String>) -> Self {
        Self {
            state: PermissionState::ProbeError,
            detail: detail.into(),
        }
    }
}

/// Who is believed to have refused a camera request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DenialReason {
    /// The browser refused without showing a prompt
    BrowserDenied,
    /// A person refused the prompt
    UserDenied,
}

/// Diagnose a denial from how long the failed request took.
///
/// The boundary is inclusive: a failure after exactly `threshold` is still a
/// browser-level denial.
pub fn diagnose_denial(elapsed: Duration, threshold: Duration) -> DenialReason {
    if elapsed <= threshold {
        DenialReason::BrowserDenied
    } else {
        DenialReason::UserDenied
    }
}
