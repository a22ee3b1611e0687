//! # Camgate - Consistent camera permission decisions
//!
//! Platform permission APIs disagree with each other and sometimes with
//! themselves. Camgate runs one hardware request between two permission
//! probes and turns the four observations into a single [`Outcome`]: accepted,
//! or denied with a diagnosis and a retry policy the UI can act on.
//!
//! ## Key Features
//!
//! - **One decision per attempt**: every start cycle resolves to exactly one outcome
//! - **Denial diagnosis**: fast failures are told apart from user clicks
//! - **Retry guidance**: retry now, after a reload (and with which button), or not at all
//! - **Device bookkeeping**: known cameras and live streams, with change notifications
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use camgate::{CameraPermissionHandler, DeviceListUpdated, HandlerConfig, Outcome};
//! use camgate_media::ScriptedPlatform;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let platform = Arc::new(ScriptedPlatform::new());
//!     let mut handler = CameraPermissionHandler::new(platform, HandlerConfig::default())?;
//!
//!     handler.on(DeviceListUpdated, |devices| {
//!         println!("{} camera(s) available", devices.len());
//!     });
//!
//!     match handler.init_handler(None).await? {
//!         Outcome::Accepted { capture, .. } => println!("streaming {}", capture.stream.id),
//!         Outcome::Denied { retry, .. } => println!("denied, retry: {:?}", retry),
//!         Outcome::Unknown { gap, .. } => println!("unclassified: {}", gap.description()),
//!     }
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export core types for easy access
pub use camgate_core::{
    classify, BrowserFamilyRule, BrowserFamilyTable, ButtonKind, CaptureErrorReason,
    CaptureFailure, CaptureOutcome, CaptureSuccess, ClassificationEngine, ClassificationGap,
    ClassificationPolicy, CoreError, DenialReason, LastAttemptMemory, MediaDeviceInfo, Outcome,
    PermissionSnapshot, PermissionState, PlatformError, RetryPolicy, StreamHandle,
    DEFAULT_BROWSER_DENIED_THRESHOLD,
};

pub use camgate_media::{
    ActiveStream, CameraConstraints, CameraFacing, CameraPlatform, MediaError, PreferredCamera,
};

pub use camgate_diagnostics::{DebugLogger, OutcomeReport};

// Public API modules
pub mod config;
pub mod error;
pub mod event;
pub mod handler;

// Re-export main API types
pub use config::HandlerConfig;
pub use error::CameraInitError;
pub use event::{
    DeviceListUpdated, EventNotifier, HandlerEvent, Log, PermissionStatusChanged,
};
pub use handler::CameraPermissionHandler;
