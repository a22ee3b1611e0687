//! Camera permission handler
//!
//! Orchestrates one start cycle: probe the permission, attempt the capture,
//! probe again, classify, then update the registry and notify listeners.
//! A handler is one logical camera session; cycles on the same handler must
//! run one after another, which `&mut self` enforces.

use crate::config::HandlerConfig;
use crate::error::CameraInitError;
use crate::event::{DeviceListUpdated, EventNotifier, HandlerEvent, PermissionStatusChanged};
use camgate_core::{
    ClassificationEngine, CoreError, LastAttemptMemory, MediaDeviceInfo, Outcome,
    PermissionSnapshot, PermissionState, PlatformError, StreamHandle,
};
use camgate_diagnostics::OutcomeReport;
use camgate_media::{
    preferred_camera, video_inputs, ActiveStream, CameraConstraints, CameraPlatform,
    CaptureAttempt, DeviceStreamRegistry, MediaResult, PermissionProbe, PreferredCamera,
};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const DEVICE_WATCHER_INSTALLED: &str = "Installed camera-device-change watcher";
const PERMISSION_WATCHER_INSTALLED: &str = "Installed camera-browser-permission watcher";

/// State shared with the change watchers
struct Shared {
    platform: Arc<dyn CameraPlatform>,
    probe: PermissionProbe,
    registry: DeviceStreamRegistry,
    events: EventNotifier,
}

impl Shared {
    async fn enumerate_video_inputs(&self) -> Result<Vec<MediaDeviceInfo>, PlatformError> {
        self.platform.enumerate_devices().await.map(video_inputs)
    }

    /// Re-enumerate, upsert and announce the full device list
    async fn refresh_devices(&self) {
        match self.enumerate_video_inputs().await {
            Ok(devices) => {
                self.registry.upsert_devices(&devices);
                self.events
                    .emit(DeviceListUpdated, &self.registry.devices());
            }
            Err(e) => warn!("Device enumeration failed: {}", e),
        }
    }

    async fn announce_permission(&self) {
        let snapshot = self.probe.snapshot().await;
        info!(state = %snapshot.state, "Camera permission changed");
        self.events.emit(PermissionStatusChanged, &snapshot);
    }
}

/// Camera permission handler
pub struct CameraPermissionHandler {
    shared: Arc<Shared>,
    engine: ClassificationEngine,
    capture: CaptureAttempt,
    config: HandlerConfig,
    selected_device_id: Option<String>,
    watchers_installed: bool,
    watchers: Vec<JoinHandle<()>>,
}

impl CameraPermissionHandler {
    /// Create a handler over `platform`
    pub fn new(platform: Arc<dyn CameraPlatform>, config: HandlerConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let engine = ClassificationEngine::new(
            config.browser_denied_threshold,
            config.reload_button_rules.clone(),
        )?;
        let capture = CaptureAttempt::new(platform.clone()).with_timeout(config.capture_timeout);
        let shared = Arc::new(Shared {
            probe: PermissionProbe::new(platform.clone()),
            platform,
            registry: DeviceStreamRegistry::new(),
            events: EventNotifier::new(),
        });

        Ok(Self {
            shared,
            engine,
            capture,
            config,
            selected_device_id: None,
            watchers_installed: false,
            watchers: Vec::new(),
        })
    }

    /// Create a handler with the default configuration
    pub fn with_defaults(platform: Arc<dyn CameraPlatform>) -> Result<Self, CoreError> {
        Self::new(platform, HandlerConfig::default())
    }

    /// Register `listener` for `event`
    pub fn on<E, F>(&self, event: E, listener: F)
    where
        E: HandlerEvent,
        F: Fn(&E::Payload) + Send + Sync + 'static,
    {
        self.shared.events.on(event, listener);
    }

    /// Run one start cycle for `device_id` (any camera when `None`)
    pub async fn start_camera(
        &mut self,
        device_id: Option<&str>,
        constraints: Option<&CameraConstraints>,
    ) -> Result<Outcome, CameraInitError> {
        self.preflight().await?;
        Ok(self.run_cycle(device_id, constraints).await)
    }

    /// Populate devices, install change watchers once, then run a start cycle
    pub async fn init_handler(
        &mut self,
        constraints: Option<&CameraConstraints>,
    ) -> Result<Outcome, CameraInitError> {
        self.preflight().await?;
        self.shared.refresh_devices().await;
        self.install_watchers();
        Ok(self.run_cycle(None, constraints).await)
    }

    /// Switch to the next camera, or to the preferred one when none is selected.
    ///
    /// Returns `None` without touching the hardware when cycling could prompt
    /// the user or when devices cannot be listed.
    pub async fn cycle_camera(&mut self) -> Result<Option<Outcome>, CameraInitError> {
        let state = self.shared.probe.probe().await;
        if matches!(state, PermissionState::Denied | PermissionState::Prompt) {
            debug!(%state, "Not cycling camera without a granted permission");
            return Ok(None);
        }

        let devices = match self.shared.enumerate_video_inputs().await {
            Ok(devices) => devices,
            Err(e) => {
                warn!("Cannot cycle camera, enumeration failed: {}", e);
                return Ok(None);
            }
        };
        self.shared.registry.upsert_devices(&devices);

        let current = self
            .selected_device_id
            .as_deref()
            .and_then(|id| devices.iter().position(|d| d.device_id == id));
        let next = match current {
            Some(index) => devices[(index + 1) % devices.len()].device_id.clone(),
            None => {
                self.preferred_camera(&devices)
                    .ok_or(CameraInitError::NoDevices)?
                    .device_id
            }
        };

        info!(device_id = %next, "Cycling camera");
        self.selected_device_id = Some(next.clone());
        self.start_camera(Some(&next), None).await.map(Some)
    }

    /// Pick the camera to open by label; logs the candidate list
    pub fn preferred_camera(&self, devices: &[MediaDeviceInfo]) -> Option<PreferredCamera> {
        match serde_json::to_string(devices) {
            Ok(json) => self.shared.events.log(json),
            Err(e) => warn!("Cannot serialize device list: {}", e),
        }
        preferred_camera(devices)
    }

    /// Current permission with a readable detail line
    pub async fn probe_permission(&self) -> PermissionSnapshot {
        self.shared.probe.snapshot().await
    }

    /// Stop every track of a registered stream
    pub async fn stop_stream(&self, stream_id: &str) -> MediaResult<ActiveStream> {
        self.shared
            .registry
            .stop_by_id(stream_id, self.shared.platform.as_ref())
            .await
    }

    /// Stop a registered stream identified by its handle
    pub async fn stop_stream_by_handle(&self, stream: &StreamHandle) -> MediaResult<ActiveStream> {
        self.shared
            .registry
            .stop_by_handle(stream, self.shared.platform.as_ref())
            .await
    }

    /// Detach one track from a registered stream
    pub async fn remove_track(&self, stream_id: &str, track_id: &str) -> MediaResult<()> {
        self.shared
            .registry
            .remove_track(stream_id, track_id, self.shared.platform.as_ref())
            .await
    }

    /// Known cameras
    pub fn devices(&self) -> Vec<MediaDeviceInfo> {
        self.shared.registry.devices()
    }

    /// A registered stream
    pub fn active_stream(&self, stream_id: &str) -> Option<ActiveStream> {
        self.shared.registry.active_stream(stream_id)
    }

    /// Identifiers of every registered stream
    pub fn active_stream_ids(&self) -> Vec<String> {
        self.shared.registry.active_stream_ids()
    }

    /// Camera chosen by the last successful cycle or by cycling
    pub fn selected_device_id(&self) -> Option<&str> {
        self.selected_device_id.as_deref()
    }

    /// Memory of the most recent classification
    pub fn last_attempt(&self) -> Option<&LastAttemptMemory> {
        self.engine.last_attempt()
    }

    /// Whether change watchers have been installed
    pub fn watchers_installed(&self) -> bool {
        self.watchers_installed
    }

    /// Handler configuration
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    async fn preflight(&self) -> Result<(), CameraInitError> {
        if !self.shared.platform.media_api_available() {
            warn!("Media API not available on this platform");
            return Err(CameraInitError::BrowserApiInaccessible);
        }
        if !self.config.require_devices {
            return Ok(());
        }
        match self.shared.enumerate_video_inputs().await {
            Ok(devices) if devices.is_empty() => {
                warn!("No video input devices found");
                Err(CameraInitError::NoDevices)
            }
            Ok(_) => Ok(()),
            Err(e) => {
                // Labels and even the list may be hidden before the first grant
                debug!("Pre-flight enumeration failed, continuing: {}", e);
                Ok(())
            }
        }
    }

    async fn run_cycle(
        &mut self,
        device_id: Option<&str>,
        constraints: Option<&CameraConstraints>,
    ) -> Outcome {
        let request =
            CameraConstraints::resolve(device_id, constraints, &self.config.default_constraints);
        let pre = self.shared.probe.probe().await;
        let capture = self.capture.attempt(&request).await;
        let post = self.shared.probe.probe().await;
        let user_agent = self.shared.platform.user_agent();

        let outcome = self.engine.classify(pre, capture, post, &user_agent);
        self.apply_outcome(&outcome, device_id);
        outcome
    }

    fn apply_outcome(&mut self, outcome: &Outcome, requested_device: Option<&str>) {
        OutcomeReport::from_outcome(outcome).log();

        let Outcome::Accepted { capture, .. } = outcome else {
            return;
        };
        let registry = &self.shared.registry;
        registry.upsert_devices(&capture.devices);

        let device_id = capture
            .stream
            .video_device_id()
            .or(requested_device)
            .map(str::to_string);
        let device = device_id.as_deref().and_then(|id| registry.device(id));
        registry.record_active_stream(capture.stream.id.clone(), capture.stream.clone(), device);
        if device_id.is_some() {
            self.selected_device_id = device_id;
        }

        self.shared.events.log(format!(
            "Camera stream {} started, {} camera(s) known",
            capture.stream.id,
            capture.devices.len()
        ));
        self.shared
            .events
            .emit(DeviceListUpdated, &registry.devices());
    }

    fn install_watchers(&mut self) {
        if self.watchers_installed {
            debug!("Change watchers already installed");
            return;
        }
        self.watchers_installed = true;

        if let Some(changes) = self.shared.platform.watch_device_changes() {
            let shared = self.shared.clone();
            self.watchers.push(tokio::spawn(watch_devices(shared, changes)));
            self.shared.events.log(DEVICE_WATCHER_INSTALLED);
        } else {
            debug!("Platform offers no device change notifications");
        }

        if let Some(changes) = self.shared.platform.watch_permission_changes() {
            let shared = self.shared.clone();
            self.watchers.push(tokio::spawn(watch_permission(shared, changes)));
            self.shared.events.log(PERMISSION_WATCHER_INSTALLED);
        } else {
            debug!("Platform offers no permission change notifications");
        }
    }
}

impl Drop for CameraPermissionHandler {
    fn drop(&mut self) {
        for watcher in self.watchers.drain(..) {
            watcher.abort();
        }
    }
}

impl std::fmt::Debug for CameraPermissionHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraPermissionHandler")
            .field("config", &self.config)
            .field("selected_device_id", &self.selected_device_id)
            .field("watchers_installed", &self.watchers_installed)
            .field("events", &self.shared.events)
            .finish()
    }
}

async fn watch_devices(shared: Arc<Shared>, mut changes: broadcast::Receiver<()>) {
    loop {
        match changes.recv().await {
            Ok(()) | Err(RecvError::Lagged(_)) => shared.refresh_devices().await,
            Err(RecvError::Closed) => break,
        }
    }
}

async fn watch_permission(shared: Arc<Shared>, mut changes: broadcast::Receiver<()>) {
    loop {
        match changes.recv().await {
            Ok(()) | Err(RecvError::Lagged(_)) => shared.announce_permission().await,
            Err(RecvError::Closed) => break,
        }
    }
}
