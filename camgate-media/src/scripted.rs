//! Scripted in-memory platform for tests, demos and unsupported hosts
//!
//! Every answer the platform gives is scripted up front: permission query
//! results, capture results with a simulated latency, the device list and the
//! user agent. Calls made against it are recorded for assertions.

use crate::constraints::CameraConstraints;
use crate::platform::CameraPlatform;
use async_trait::async_trait;
use camgate_core::{
    MediaDeviceInfo, MediaTrack, NativePermissionState, PlatformError, StreamHandle, TrackKind,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;
use uuid::Uuid;

/// One scripted answer to a stream request
#[derive(Debug, Clone)]
pub enum ScriptedCapture {
    /// Grant a stream after `latency`
    Grant {
        /// Stream to hand out; generated from the request when `None`
        stream: Option<StreamHandle>,
        /// Simulated time until the request resolves
        latency: Duration,
    },
    /// Reject the request after `latency`
    Fail {
        /// Error to raise
        error: PlatformError,
        /// Simulated time until the request rejects
        latency: Duration,
    },
}

impl ScriptedCapture {
    /// Grant a generated stream
    pub fn grant(latency: Duration) -> Self {
        ScriptedCapture::Grant {
            stream: None,
            latency,
        }
    }

    /// Grant a specific stream
    pub fn grant_stream(stream: StreamHandle, latency: Duration) -> Self {
        ScriptedCapture::Grant {
            stream: Some(stream),
            latency,
        }
    }

    /// Reject with `error`
    pub fn fail(error: PlatformError, latency: Duration) -> Self {
        ScriptedCapture::Fail { error, latency }
    }
}

/// Scripted camera platform
pub struct ScriptedPlatform {
    media_api_available: AtomicBool,
    watchers_supported: AtomicBool,
    user_agent: Mutex<String>,
    permissions: Mutex<VecDeque<Result<NativePermissionState, PlatformError>>>,
    default_permission: Mutex<Result<NativePermissionState, PlatformError>>,
    captures: Mutex<VecDeque<ScriptedCapture>>,
    devices: Mutex<Result<Vec<MediaDeviceInfo>, PlatformError>>,
    requests: Mutex<Vec<CameraConstraints>>,
    stopped_tracks: Mutex<Vec<String>>,
    removed_tracks: Mutex<Vec<(String, String)>>,
    device_changes: broadcast::Sender<()>,
    permission_changes: broadcast::Sender<()>,
}

impl Default for ScriptedPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedPlatform {
    /// Platform with one back camera, permission `Prompt` and no scripted captures
    pub fn new() -> Self {
        let (device_changes, _) = broadcast::channel(16);
        let (permission_changes, _) = broadcast::channel(16);
        Self {
            media_api_available: AtomicBool::new(true),
            watchers_supported: AtomicBool::new(true),
            user_agent: Mutex::new(String::new()),
            permissions: Mutex::new(VecDeque::new()),
            default_permission: Mutex::new(Ok(NativePermissionState::Prompt)),
            captures: Mutex::new(VecDeque::new()),
            devices: Mutex::new(Ok(vec![MediaDeviceInfo::video_input(
                "cam-back",
                "Back Camera",
            )])),
            requests: Mutex::new(Vec::new()),
            stopped_tracks: Mutex::new(Vec::new()),
            removed_tracks: Mutex::new(Vec::new()),
            device_changes,
            permission_changes,
        }
    }

    /// Set the user agent
    pub fn with_user_agent(self, user_agent: impl Into<String>) -> Self {
        *self.user_agent.lock() = user_agent.into();
        self
    }

    /// Set the device list returned by enumeration
    pub fn with_devices(self, devices: Vec<MediaDeviceInfo>) -> Self {
        self.set_devices(Ok(devices));
        self
    }

    /// Pretend the host has no stream request API
    pub fn without_media_api(self) -> Self {
        self.media_api_available.store(false, Ordering::SeqCst);
        self
    }

    /// Pretend the host cannot notify about changes
    pub fn without_watchers(self) -> Self {
        self.watchers_supported.store(false, Ordering::SeqCst);
        self
    }

    /// Queue permission query answers, consumed one per query
    pub fn script_permissions<I>(&self, answers: I)
    where
        I: IntoIterator<Item = Result<NativePermissionState, PlatformError>>,
    {
        self.permissions.lock().extend(answers);
    }

    /// Answer used once the permission queue is empty
    pub fn set_default_permission(&self, answer: Result<NativePermissionState, PlatformError>) {
        *self.default_permission.lock() = answer;
    }

    /// Queue capture answers, consumed one per stream request
    pub fn script_captures<I>(&self, captures: I)
    where
        I: IntoIterator<Item = ScriptedCapture>,
    {
        self.captures.lock().extend(captures);
    }

    /// Replace the enumeration result
    pub fn set_devices(&self, devices: Result<Vec<MediaDeviceInfo>, PlatformError>) {
        *self.devices.lock() = devices;
    }

    /// Fire a device-list change notification
    pub fn notify_device_change(&self) {
        let _ = self.device_changes.send(());
    }

    /// Fire a permission change notification
    pub fn notify_permission_change(&self) {
        let _ = self.permission_changes.send(());
    }

    /// Constraints of every stream request made so far
    pub fn requests(&self) -> Vec<CameraConstraints> {
        self.requests.lock().clone()
    }

    /// Identifiers of every stopped track
    pub fn stopped_tracks(&self) -> Vec<String> {
        self.stopped_tracks.lock().clone()
    }

    /// `(stream id, track id)` of every removed track
    pub fn removed_tracks(&self) -> Vec<(String, String)> {
        self.removed_tracks.lock().clone()
    }

    fn generate_stream(&self, constraints: &CameraConstraints) -> StreamHandle {
        let device_id = constraints.exact_device().map(str::to_string).or_else(|| {
            self.devices.lock().as_ref().ok().and_then(|devices| {
                devices
                    .iter()
                    .find(|d| d.is_video_input())
                    .map(|d| d.device_id.clone())
            })
        });
        StreamHandle {
            id: Uuid::new_v4().to_string(),
            tracks: vec![MediaTrack {
                id: Uuid::new_v4().to_string(),
                kind: TrackKind::Video,
                device_id,
            }],
        }
    }
}

async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

#[async_trait]
impl CameraPlatform for ScriptedPlatform {
    fn media_api_available(&self) -> bool {
        self.media_api_available.load(Ordering::SeqCst)
    }

    fn user_agent(&self) -> String {
        self.user_agent.lock().clone()
    }

    async fn query_camera_permission(&self) -> Result<NativePermissionState, PlatformError> {
        let scripted = self.permissions.lock().pop_front();
        scripted.unwrap_or_else(|| self.default_permission.lock().clone())
    }

    async fn request_camera_stream(
        &self,
        constraints: &CameraConstraints,
    ) -> Result<StreamHandle, PlatformError> {
        self.requests.lock().push(constraints.clone());
        let scripted = self.captures.lock().pop_front();
        match scripted {
            Some(ScriptedCapture::Grant { stream, latency }) => {
                simulate_latency(latency).await;
                Ok(stream.unwrap_or_else(|| self.generate_stream(constraints)))
            }
            Some(ScriptedCapture::Fail { error, latency }) => {
                simulate_latency(latency).await;
                Err(error)
            }
            None => Err(PlatformError::named(
                "NotFoundError",
                "Requested device not found",
            )),
        }
    }

    async fn enumerate_devices(&self) -> Result<Vec<MediaDeviceInfo>, PlatformError> {
        self.devices.lock().clone()
    }

    async fn stop_track(&self, track: &MediaTrack) -> Result<(), PlatformError> {
        self.stopped_tracks.lock().push(track.id.clone());
        Ok(())
    }

    async fn remove_track(
        &self,
        stream: &StreamHandle,
        track_id: &str,
    ) -> Result<(), PlatformError> {
        self.removed_tracks
            .lock()
            .push((stream.id.clone(), track_id.to_string()));
        Ok(())
    }

    fn watch_device_changes(&self) -> Option<broadcast::Receiver<()>> {
        self.watchers_supported
            .load(Ordering::SeqCst)
            .then(|| self.device_changes.subscribe())
    }

    fn watch_permission_changes(&self) -> Option<broadcast::Receiver<()>> {
        self.watchers_supported
            .load(Ordering::SeqCst)
            .then(|| self.permission_changes.subscribe())
    }
}
