//! Capture attempts
//!
//! One attempt issues exactly one stream request, times it, and reports a
//! [`CaptureOutcome`]. A granted attempt also lists the available cameras;
//! that listing is best-effort and never turns a success into a failure.

pub mod error_map;

pub use error_map::{map_platform_error, OVERCONSTRAINED_TAG};

use crate::constraints::CameraConstraints;
use crate::devices::video_inputs;
use crate::platform::CameraPlatform;
use camgate_core::{
    CaptureErrorReason, CaptureFailure, CaptureOutcome, CaptureSuccess, MediaDeviceInfo,
    PlatformError,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Issues timed stream requests against a platform
#[derive(Clone)]
pub struct CaptureAttempt {
    platform: Arc<dyn CameraPlatform>,
    timeout: Option<Duration>,
}

impl CaptureAttempt {
    /// Create an attempt runner without a timeout
    pub fn new(platform: Arc<dyn CameraPlatform>) -> Self {
        Self {
            platform,
            timeout: None,
        }
    }

    /// Give up on requests that have not resolved after `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Issue one stream request with `constraints`
    pub async fn attempt(&self, constraints: &CameraConstraints) -> CaptureOutcome {
        let start = Instant::now();
        let request = self.platform.request_camera_stream(constraints);
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, request).await {
                Ok(result) => result.map_err(Rejection::Platform),
                Err(_) => Err(Rejection::TimedOut(limit)),
            },
            None => request.await.map_err(Rejection::Platform),
        };
        let elapsed = start.elapsed();

        match result {
            Ok(stream) => {
                let devices = self.list_devices_best_effort().await;
                info!(
                    stream_id = %stream.id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    devices = devices.len(),
                    "Camera stream acquired"
                );
                CaptureOutcome::Success(CaptureSuccess {
                    stream,
                    devices,
                    elapsed,
                })
            }
            Err(Rejection::Platform(error)) => {
                let reason = map_platform_error(&error);
                info!(
                    error = %error,
                    ?reason,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Camera request rejected"
                );
                CaptureOutcome::Failure(CaptureFailure {
                    reason,
                    original_error: error.rendered(),
                    elapsed,
                })
            }
            Err(Rejection::TimedOut(limit)) => {
                warn!(timeout_ms = limit.as_millis() as u64, "Camera request timed out");
                CaptureOutcome::Failure(CaptureFailure {
                    reason: CaptureErrorReason::Timeout,
                    original_error: format!("Timeout: media request took longer than {:?}", limit),
                    elapsed,
                })
            }
        }
    }

    async fn list_devices_best_effort(&self) -> Vec<MediaDeviceInfo> {
        match self.platform.enumerate_devices().await {
            Ok(devices) => video_inputs(devices),
            Err(e) => {
                debug!("Device listing after capture failed: {}", e);
                Vec::new()
            }
        }
    }
}

enum Rejection {
    Platform(PlatformError),
    TimedOut(Duration),
}
