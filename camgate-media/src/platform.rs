//! Host platform collaborator interface
//!
//! Real implementations are thin bindings over a host's permission and media
//! APIs. They contain no decision logic: every method reports what the host
//! said, and every failure is returned as a [`PlatformError`].

use crate::constraints::CameraConstraints;
use async_trait::async_trait;
use camgate_core::{MediaDeviceInfo, MediaTrack, NativePermissionState, PlatformError, StreamHandle};
use tokio::sync::broadcast;

/// Platform-specific camera and permission backend
#[async_trait]
pub trait CameraPlatform: Send + Sync {
    /// Whether the host exposes a stream request API at all
    fn media_api_available(&self) -> bool;

    /// Identifying string of the host (a browser's user agent)
    fn user_agent(&self) -> String;

    /// Query the camera permission
    async fn query_camera_permission(&self) -> Result<NativePermissionState, PlatformError>;

    /// Request one live camera stream
    async fn request_camera_stream(
        &self,
        constraints: &CameraConstraints,
    ) -> Result<StreamHandle, PlatformError>;

    /// Enumerate all media devices; callers filter by kind
    async fn enumerate_devices(&self) -> Result<Vec<MediaDeviceInfo>, PlatformError>;

    /// Halt one hardware track
    async fn stop_track(&self, track: &MediaTrack) -> Result<(), PlatformError>;

    /// Detach a track from a stream without stopping the others
    async fn remove_track(
        &self,
        stream: &StreamHandle,
        track_id: &str,
    ) -> Result<(), PlatformError>;

    /// Subscribe to device-list change notifications; `None` when unsupported
    fn watch_device_changes(&self) -> Option<broadcast::Receiver<()>>;

    /// Subscribe to permission change notifications; `None` when unsupported
    fn watch_permission_changes(&self) -> Option<broadcast::Receiver<()>>;
}
