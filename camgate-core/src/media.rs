//! Device descriptors and stream handles shared across the workspace

use serde::{Deserialize, Serialize};

/// Kind of media device reported by enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaDeviceKind {
    /// Camera
    VideoInput,
    /// Microphone
    AudioInput,
    /// Speaker or headset
    AudioOutput,
}

/// Descriptor of one media device
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaDeviceInfo {
    /// Platform device identifier
    pub device_id: String,
    /// Group shared by devices on the same physical hardware
    pub group_id: String,
    /// Device kind
    pub kind: MediaDeviceKind,
    /// Human-readable label; empty until permission has been granted on some platforms
    pub label: String,
}

impl MediaDeviceInfo {
    /// Convenience constructor for a camera descriptor
    pub fn video_input(device_id: impl Into<String>, label: impl Into<String>) -> Self {
        let device_id = device_id.into();
        Self {
            group_id: device_id.clone(),
            device_id,
            kind: MediaDeviceKind::VideoInput,
            label: label.into(),
        }
    }

    /// Whether this device is a camera
    pub fn is_video_input(&self) -> bool {
        self.kind == MediaDeviceKind::VideoInput
    }
}

/// Kind of track carried by a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Video track
    Video,
    /// Audio track
    Audio,
}

/// One track of a live stream
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaTrack {
    /// Track identifier
    pub id: String,
    /// Track kind
    pub kind: TrackKind,
    /// Device the track is sourced from, when the platform reports it
    pub device_id: Option<String>,
}

/// Opaque handle to a live stream obtained from the platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamHandle {
    /// Platform stream identifier
    pub id: String,
    /// Tracks currently attached to the stream
    pub tracks: Vec<MediaTrack>,
}

impl StreamHandle {
    /// First video track of the stream
    pub fn video_track(&self) -> Option<&MediaTrack> {
        self.tracks.iter().find(|t| t.kind == TrackKind::Video)
    }

    /// Device feeding the first video track
    pub fn video_device_id(&self) -> Option<&str> {
        self.video_track().and_then(|t| t.device_id.as_deref())
    }

    /// Whether the stream carries at least one video track
    pub fn has_video(&self) -> bool {
        self.video_track().is_some()
    }
}
