//! Integration tests for the device and stream registry

use camgate_core::{CaptureOutcome, MediaDeviceInfo};
use camgate_media::*;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_captured_stream_lifecycle() {
    let platform = Arc::new(ScriptedPlatform::new().with_devices(vec![
        MediaDeviceInfo::video_input("cam-front", "Front Camera"),
        MediaDeviceInfo::video_input("cam-back", "Back Camera"),
    ]));
    platform.script_captures([ScriptedCapture::grant(Duration::from_millis(120))]);
    let registry = DeviceStreamRegistry::new();

    let constraints =
        CameraConstraints::resolve(Some("cam-back"), None, &CameraConstraints::default());
    let success = match CaptureAttempt::new(platform.clone())
        .attempt(&constraints)
        .await
    {
        CaptureOutcome::Success(success) => success,
        other => panic!("expected success, got {other:?}"),
    };

    registry.upsert_devices(&success.devices);
    let device = success
        .stream
        .video_device_id()
        .and_then(|id| registry.device(id));
    registry.record_active_stream(success.stream.id.clone(), success.stream.clone(), device);

    let active = registry
        .active_stream(&success.stream.id)
        .expect("stream registered");
    assert_eq!(
        active.device.map(|d| d.label),
        Some("Back Camera".to_string())
    );
    assert_eq!(registry.active_stream_ids(), vec![success.stream.id.clone()]);

    registry
        .stop_by_id(&success.stream.id, &*platform)
        .await
        .expect("stop registered stream");
    assert!(registry.active_stream_ids().is_empty());
    assert_eq!(platform.stopped_tracks().len(), 1);

    let again = registry.stop_by_id(&success.stream.id, &*platform).await;
    assert_eq!(
        again.map_err(|e| e.category()),
        Err(ErrorCategory::NotFound)
    );
}

#[test]
fn test_concurrent_device_updates_converge() {
    let registry = Arc::new(DeviceStreamRegistry::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = registry.clone();
            std::thread::spawn(move || {
                registry.upsert_devices(&[
                    MediaDeviceInfo::video_input("shared", "Camera"),
                    MediaDeviceInfo::video_input(format!("cam-{i}"), ""),
                ]);
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("updater thread");
    }

    let devices = registry.devices();
    assert_eq!(devices.len(), 5);
    assert_eq!(
        devices.iter().filter(|d| d.device_id == "shared").count(),
        1
    );
}
