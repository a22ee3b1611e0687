//! Permission state probe

use crate::platform::CameraPlatform;
use camgate_core::{PermissionSnapshot, PermissionState};
use std::sync::Arc;
use tracing::{debug, warn};

/// Reads the current camera permission from the platform
#[derive(Clone)]
pub struct PermissionProbe {
    platform: Arc<dyn CameraPlatform>,
}

impl PermissionProbe {
    /// Create a probe over `platform`
    pub fn new(platform: Arc<dyn CameraPlatform>) -> Self {
        Self { platform }
    }

    /// Current permission state; a failed query yields [`PermissionState::ProbeError`]
    pub async fn probe(&self) -> PermissionState {
        self.snapshot().await.state
    }

    /// Current permission state with a human-readable detail line
    pub async fn snapshot(&self) -> PermissionSnapshot {
        match self.platform.query_camera_permission().await {
            Ok(state) => {
                let snapshot = PermissionSnapshot::observed(state);
                debug!(state = %snapshot.state, "Camera permission probed");
                snapshot
            }
            Err(e) => {
                warn!("Camera permission query failed: {}", e);
                PermissionSnapshot::probe_failed(e.rendered())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedPlatform;
    use camgate_core::{NativePermissionState, PlatformError};

    #[tokio::test]
    async fn test_probe_maps_native_states() {
        let platform = Arc::new(ScriptedPlatform::new());
        platform.script_permissions([
            Ok(NativePermissionState::Granted),
            Ok(NativePermissionState::Denied),
            Ok(NativePermissionState::Prompt),
        ]);
        let probe = PermissionProbe::new(platform);

        assert_eq!(probe.probe().await, PermissionState::Granted);
        assert_eq!(probe.probe().await, PermissionState::Denied);
        assert_eq!(probe.probe().await, PermissionState::Prompt);
    }

    #[tokio::test]
    async fn test_probe_failure_is_surfaced_not_raised() {
        let platform = Arc::new(ScriptedPlatform::new());
        platform.script_permissions([Err(PlatformError::named(
            "TypeError",
            "'camera' is not a valid value for enumeration PermissionName.",
        ))]);
        let probe = PermissionProbe::new(platform);

        let snapshot = probe.snapshot().await;
        assert_eq!(snapshot.state, PermissionState::ProbeError);
        assert!(snapshot.detail.starts_with("TypeError:"));
    }
}
