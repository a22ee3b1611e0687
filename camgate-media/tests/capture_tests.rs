//! Integration tests for capture attempts and the permission probe
//!
//! Every test runs against the scripted platform with tokio's clock paused,
//! so elapsed times are exact.

use camgate_core::{
    CaptureErrorReason, CaptureOutcome, NativePermissionState, PermissionState, PlatformError,
};
use camgate_media::*;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// ERROR MAPPING
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_platform_errors_map_to_reasons() {
    let cases = [
        (
            PlatformError::named("NotAllowedError", "Permission denied"),
            CaptureErrorReason::PermissionDenied,
        ),
        (
            PlatformError::named("NotAllowedError", "Permission dismissed"),
            CaptureErrorReason::PermissionDismissed,
        ),
        (
            PlatformError::named("NotReadableError", "Device in use"),
            CaptureErrorReason::InUse,
        ),
        (
            PlatformError::unnamed(OVERCONSTRAINED_TAG),
            CaptureErrorReason::Overconstrained,
        ),
        (PlatformError::unnamed(""), CaptureErrorReason::Unknown),
    ];

    for (error, expected) in cases {
        let platform = Arc::new(ScriptedPlatform::new());
        platform.script_captures([ScriptedCapture::fail(
            error.clone(),
            Duration::from_millis(40),
        )]);

        let outcome = CaptureAttempt::new(platform)
            .attempt(&CameraConstraints::default())
            .await;
        match outcome {
            CaptureOutcome::Failure(failure) => {
                assert_eq!(failure.reason, expected, "mapping {error}");
                assert_eq!(failure.original_error, error.rendered());
                assert_eq!(failure.elapsed, Duration::from_millis(40));
            }
            other => panic!("expected failure for {error}, got {other:?}"),
        }
    }
}

// ============================================================================
// CAPTURE LIFECYCLE
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_one_request_per_attempt() {
    let platform = Arc::new(ScriptedPlatform::new());
    platform.script_captures([
        ScriptedCapture::grant(Duration::from_millis(300)),
        ScriptedCapture::grant(Duration::from_millis(300)),
    ]);
    let attempt = CaptureAttempt::new(platform.clone());

    let outcome = attempt.attempt(&CameraConstraints::any_camera()).await;
    assert!(outcome.is_success());
    assert_eq!(outcome.elapsed(), Duration::from_millis(300));
    assert_eq!(platform.requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_exact_device_reaches_platform() {
    let platform = Arc::new(ScriptedPlatform::new());
    platform.script_captures([ScriptedCapture::grant(Duration::ZERO)]);

    let constraints =
        CameraConstraints::resolve(Some("cam-front"), None, &CameraConstraints::default());
    let outcome = CaptureAttempt::new(platform.clone())
        .attempt(&constraints)
        .await;

    match outcome {
        CaptureOutcome::Success(success) => {
            assert_eq!(success.stream.video_device_id(), Some("cam-front"));
        }
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(platform.requests()[0].exact_device(), Some("cam-front"));
}

#[tokio::test(start_paused = true)]
async fn test_request_within_timeout_succeeds() {
    let platform = Arc::new(ScriptedPlatform::new());
    platform.script_captures([ScriptedCapture::grant(Duration::from_secs(2))]);

    let outcome = CaptureAttempt::new(platform)
        .with_timeout(Some(Duration::from_secs(5)))
        .attempt(&CameraConstraints::default())
        .await;
    assert!(outcome.is_success());
    assert_eq!(outcome.elapsed(), Duration::from_secs(2));
}

// ============================================================================
// PERMISSION PROBE
// ============================================================================

#[tokio::test]
async fn test_probe_snapshot_details() {
    let platform = Arc::new(ScriptedPlatform::new());
    platform.script_permissions([
        Ok(NativePermissionState::Granted),
        Err(PlatformError::named("NotSupportedError", "query unsupported")),
    ]);
    let probe = PermissionProbe::new(platform);

    let granted = probe.snapshot().await;
    assert_eq!(granted.state, PermissionState::Granted);
    assert!(!granted.detail.is_empty());

    let failed = probe.snapshot().await;
    assert_eq!(failed.state, PermissionState::ProbeError);
    assert_eq!(failed.detail, "NotSupportedError: query unsupported");
}
