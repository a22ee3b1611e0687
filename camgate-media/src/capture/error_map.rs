//! Mapping of raw platform errors to capture error reasons
//!
//! Rules are evaluated in order and the first match wins. The over-constraint
//! check runs before any name-based rule because some hosts raise it without
//! a name.

use camgate_core::{CaptureErrorReason, PlatformError};

/// Rendered form of the host's over-constraint error.
///
/// An error carrying this name also maps to `Overconstrained`, whatever its message.
pub const OVERCONSTRAINED_TAG: &str = "OverconstrainedError";

const NOT_ALLOWED: &str = "NotAllowedError";
const NOT_READABLE: &str = "NotReadableError";
const DEVICE_IN_USE: &str = "device in use";

/// Map a platform error to a capture error reason
pub fn map_platform_error(error: &PlatformError) -> CaptureErrorReason {
    let rendered = error.rendered();
    if rendered.is_empty() {
        return CaptureErrorReason::Unknown;
    }
    if rendered == OVERCONSTRAINED_TAG || error.name() == Some(OVERCONSTRAINED_TAG) {
        return CaptureErrorReason::Overconstrained;
    }
    let Some(name) = error.name() else {
        return CaptureErrorReason::Unknown;
    };

    if name == NOT_ALLOWED && rendered.contains("denied") {
        return CaptureErrorReason::PermissionDenied;
    }
    if name == NOT_ALLOWED && rendered.contains("dismissed") {
        return CaptureErrorReason::PermissionDismissed;
    }
    if name == NOT_READABLE
        && error
            .detail()
            .is_some_and(|detail| detail.eq_ignore_ascii_case(DEVICE_IN_USE))
    {
        return CaptureErrorReason::InUse;
    }

    // "Could not start video source" carries no NotReadableError name on some hosts
    let lowered = rendered.to_lowercase();
    if lowered.contains("start") && lowered.contains("failed") {
        return CaptureErrorReason::InUse;
    }

    CaptureErrorReason::Unknown
}
