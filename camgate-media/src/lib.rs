//! # Camgate Media
//!
//! Platform-facing side of the camera permission handler: the host platform
//! trait, the permission probe, capture attempts with error mapping, and the
//! registry of known cameras and live streams.

#![warn(clippy::all)]

pub mod capture;
pub mod constraints;
pub mod devices;
pub mod error;
pub mod platform;
pub mod probe;
pub mod registry;
pub mod scripted;

// Re-export main types
pub use capture::{map_platform_error, CaptureAttempt, OVERCONSTRAINED_TAG};
pub use constraints::{
    CameraConstraints, Constrain, FacingMode, VideoConstraints, VideoRequest, VideoResolution,
};
pub use devices::{preferred_camera, video_inputs, CameraFacing, PreferredCamera};
pub use error::{ErrorCategory, IntoMediaError, MediaError, MediaResult};
pub use platform::CameraPlatform;
pub use probe::PermissionProbe;
pub use registry::{ActiveStream, DeviceStreamRegistry};
pub use scripted::{ScriptedCapture, ScriptedPlatform};
