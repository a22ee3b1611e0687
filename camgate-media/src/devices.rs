//! Camera selection helpers

use camgate_core::MediaDeviceInfo;
use serde::{Deserialize, Serialize};

/// Which way a selected camera is believed to face, judged by its label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    /// Rear camera
    Environment,
    /// Front camera
    User,
    /// Label gave no hint
    Unknown,
}

/// Result of [`preferred_camera`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredCamera {
    /// Device to open
    pub device_id: String,
    /// Facing guessed from the label
    pub facing: CameraFacing,
}

const ENVIRONMENT_HINTS: [&str; 2] = ["back", "environment"];
const USER_HINTS: [&str; 2] = ["front", "user"];

/// Keep only camera descriptors
pub fn video_inputs(devices: Vec<MediaDeviceInfo>) -> Vec<MediaDeviceInfo> {
    devices.into_iter().filter(|d| d.is_video_input()).collect()
}

/// Pick the camera to open when the caller did not name one.
///
/// Rear cameras win over front cameras; otherwise the first device is used.
pub fn preferred_camera(devices: &[MediaDeviceInfo]) -> Option<PreferredCamera> {
    let labelled = |hints: &[&str]| {
        devices.iter().find(|device| {
            let label = device.label.to_lowercase();
            hints.iter().any(|hint| label.contains(hint))
        })
    };

    let (device, facing) = if let Some(device) = labelled(&ENVIRONMENT_HINTS) {
        (device, CameraFacing::Environment)
    } else if let Some(device) = labelled(&USER_HINTS) {
        (device, CameraFacing::User)
    } else {
        (devices.first()?, CameraFacing::Unknown)
    };

    Some(PreferredCamera {
        device_id: device.device_id.clone(),
        facing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use camgate_core::MediaDeviceKind;

    #[test]
    fn test_rear_camera_preferred() {
        let devices = vec![
            MediaDeviceInfo::video_input("front", "Front Camera"),
            MediaDeviceInfo::video_input("rear", "camera2 0, facing BACK"),
        ];
        assert_eq!(
            preferred_camera(&devices),
            Some(PreferredCamera {
                device_id: "rear".to_string(),
                facing: CameraFacing::Environment,
            })
        );
    }

    #[test]
    fn test_front_then_first() {
        let devices = vec![
            MediaDeviceInfo::video_input("usb", "USB Webcam"),
            MediaDeviceInfo::video_input("selfie", "User Facing"),
        ];
        assert_eq!(
            preferred_camera(&devices).map(|p| p.facing),
            Some(CameraFacing::User)
        );

        let unlabelled = vec![MediaDeviceInfo::video_input("only", "")];
        let preferred = preferred_camera(&unlabelled).expect("one device");
        assert_eq!(preferred.device_id, "only");
        assert_eq!(preferred.facing, CameraFacing::Unknown);

        assert_eq!(preferred_camera(&[]), None);
    }

    #[test]
    fn test_video_inputs_filter() {
        let devices = vec![
            MediaDeviceInfo::video_input("cam", "Camera"),
            MediaDeviceInfo {
                device_id: "spk".to_string(),
                group_id: "spk".to_string(),
                kind: MediaDeviceKind::AudioOutput,
                label: "Speakers".to_string(),
            },
        ];
        let cameras = video_inputs(devices);
        assert_eq!(cameras.len(), 1);
        assert_eq!(cameras[0].device_id, "cam");
    }
}
