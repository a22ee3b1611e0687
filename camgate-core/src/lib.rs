//! # camgate core
//!
//! Data model and decision logic for camera permission negotiation.
//! This crate answers one question for a finished capture cycle: was the
//! camera granted, and if not, who refused it and can the caller retry.
//! It performs no I/O; probing and capturing live in `camgate-media`.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod browser;
pub mod classify;
pub mod error;
pub mod media;
pub mod outcome;
pub mod permission;

// Re-export main types
pub use browser::{BrowserFamilyRule, BrowserFamilyTable, ReloadButtonResolution};
pub use classify::{classify, ClassificationEngine, ClassificationPolicy, LastAttemptMemory};
pub use error::{CoreError, PlatformError};
pub use media::{MediaDeviceInfo, MediaDeviceKind, MediaTrack, StreamHandle, TrackKind};
pub use outcome::{
    ButtonKind, CaptureErrorReason, CaptureFailure, CaptureOutcome, CaptureSuccess,
    ClassificationGap, Outcome, RetryPolicy,
};
pub use permission::{
    diagnose_denial, DenialReason, NativePermissionState, PermissionSnapshot, PermissionState,
    DEFAULT_BROWSER_DENIED_THRESHOLD,
};
