//! Pre-flight errors of a camera start cycle

use thiserror::Error;

/// Reasons a start cycle is refused before any permission is probed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraInitError {
    /// The host exposes no stream request API
    #[error("Browser media API is not accessible")]
    BrowserApiInaccessible,

    /// Enumeration succeeded but found no camera
    #[error("No video input devices found")]
    NoDevices,
}

impl CameraInitError {
    /// Get error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CameraInitError::BrowserApiInaccessible => "BROWSER_API_INACCESSIBLE",
            CameraInitError::NoDevices => "NO_DEVICES",
        }
    }
}
