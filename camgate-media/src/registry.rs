//! Device and stream registry
//!
//! Holds the known camera list and the live streams handed out by successful
//! captures. Device updates are upserts keyed by device id, so repeated or
//! interleaved updates from watchers and capture cycles converge on the same
//! list.

use crate::error::{IntoMediaError, MediaError, MediaResult};
use crate::platform::CameraPlatform;
use camgate_core::{MediaDeviceInfo, StreamHandle};
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

/// A live stream and the camera feeding it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveStream {
    /// Handle returned by the platform
    pub stream: StreamHandle,
    /// Camera descriptor, when the device was known at registration time
    pub device: Option<MediaDeviceInfo>,
}

/// Registry of known cameras and live streams
#[derive(Debug, Default)]
pub struct DeviceStreamRegistry {
    devices: RwLock<Vec<MediaDeviceInfo>>,
    streams: DashMap<String, ActiveStream>,
}

impl DeviceStreamRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace devices by id; first-seen order is kept
    pub fn upsert_devices(&self, devices: &[MediaDeviceInfo]) {
        let mut known = self.devices.write();
        for device in devices {
            match known.iter_mut().find(|d| d.device_id == device.device_id) {
                Some(existing) => *existing = device.clone(),
                None => known.push(device.clone()),
            }
        }
        debug!(count = known.len(), "Device registry updated");
    }

    /// Snapshot of the known devices
    pub fn devices(&self) -> Vec<MediaDeviceInfo> {
        self.devices.read().clone()
    }

    /// Look up a device by id
    pub fn device(&self, device_id: &str) -> Option<MediaDeviceInfo> {
        self.devices
            .read()
            .iter()
            .find(|d| d.device_id == device_id)
            .cloned()
    }

    /// Register a live stream under `stream_id`
    pub fn record_active_stream(
        &self,
        stream_id: impl Into<String>,
        stream: StreamHandle,
        device: Option<MediaDeviceInfo>,
    ) {
        let stream_id = stream_id.into();
        info!(%stream_id, device = ?device.as_ref().map(|d| &d.device_id), "Stream registered");
        self.streams.insert(stream_id, ActiveStream { stream, device });
    }

    /// Look up a live stream
    pub fn active_stream(&self, stream_id: &str) -> Option<ActiveStream> {
        self.streams.get(stream_id).map(|entry| entry.value().clone())
    }

    /// Whether a stream is registered under `stream_id`
    pub fn contains_stream(&self, stream_id: &str) -> bool {
        self.streams.contains_key(stream_id)
    }

    /// Identifiers of every live stream
    pub fn active_stream_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.streams.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Stop every track of a registered stream and forget it.
    ///
    /// Track stop failures are logged; the stream is removed regardless.
    pub async fn stop_by_id(
        &self,
        stream_id: &str,
        platform: &dyn CameraPlatform,
    ) -> MediaResult<ActiveStream> {
        let (_, active) = self
            .streams
            .remove(stream_id)
            .ok_or_else(|| MediaError::StreamNotFound {
                stream_id: stream_id.to_string(),
            })?;

        for track in &active.stream.tracks {
            if let Err(e) = platform.stop_track(track).await {
                warn!(%stream_id, track_id = %track.id, "Failed to stop track: {}", e);
            }
        }
        info!(%stream_id, tracks = active.stream.tracks.len(), "Stream stopped");
        Ok(active)
    }

    /// Stop a stream identified by its handle
    pub async fn stop_by_handle(
        &self,
        stream: &StreamHandle,
        platform: &dyn CameraPlatform,
    ) -> MediaResult<ActiveStream> {
        self.stop_by_id(&stream.id, platform).await
    }

    /// Detach one track from a registered stream, leaving the rest running
    pub async fn remove_track(
        &self,
        stream_id: &str,
        track_id: &str,
        platform: &dyn CameraPlatform,
    ) -> MediaResult<()> {
        let stream = self
            .active_stream(stream_id)
            .ok_or_else(|| MediaError::StreamNotFound {
                stream_id: stream_id.to_string(),
            })?
            .stream;
        if !stream.tracks.iter().any(|t| t.id == track_id) {
            return Err(MediaError::TrackNotFound {
                stream_id: stream_id.to_string(),
                track_id: track_id.to_string(),
            });
        }

        platform
            .remove_track(&stream, track_id)
            .await
            .map_err(|e| e.into_media_error("remove_track"))?;

        // The entry may have been stopped while the platform call was pending
        if let Some(mut entry) = self.streams.get_mut(stream_id) {
            entry.stream.tracks.retain(|t| t.id != track_id);
        }
        debug!(%stream_id, %track_id, "Track removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedPlatform;
    use camgate_core::{MediaTrack, TrackKind};

    fn stream(id: &str, track_ids: &[&str]) -> StreamHandle {
        StreamHandle {
            id: id.to_string(),
            tracks: track_ids
                .iter()
                .map(|t| MediaTrack {
                    id: t.to_string(),
                    kind: TrackKind::Video,
                    device_id: Some("cam-1".to_string()),
                })
                .collect(),
        }
    }

    #[test]
    fn test_upsert_is_idempotent_and_ordered() {
        let registry = DeviceStreamRegistry::new();
        let first = vec![
            MediaDeviceInfo::video_input("a", ""),
            MediaDeviceInfo::video_input("b", ""),
        ];
        registry.upsert_devices(&first);
        registry.upsert_devices(&first);
        registry.upsert_devices(&[
            MediaDeviceInfo::video_input("b", "Back Camera"),
            MediaDeviceInfo::video_input("c", "Front Camera"),
        ]);

        let devices = registry.devices();
        let ids: Vec<&str> = devices.iter().map(|d| d.device_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(registry.device("b").map(|d| d.label), Some("Back Camera".to_string()));
    }

    #[test]
    fn test_stop_unknown_stream() {
        let registry = DeviceStreamRegistry::new();
        let platform = ScriptedPlatform::new();
        let result = tokio_test::block_on(registry.stop_by_id("missing", &platform));
        assert_eq!(
            result,
            Err(MediaError::StreamNotFound {
                stream_id: "missing".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_stop_stops_every_track() {
        let registry = DeviceStreamRegistry::new();
        let platform = ScriptedPlatform::new();
        registry.record_active_stream("s1", stream("s1", &["v1", "v2"]), None);

        let stopped = registry
            .stop_by_handle(&stream("s1", &[]), &platform)
            .await
            .expect("registered stream");
        assert_eq!(stopped.stream.tracks.len(), 2);
        assert_eq!(platform.stopped_tracks(), vec!["v1", "v2"]);
        assert!(!registry.contains_stream("s1"));
    }

    #[tokio::test]
    async fn test_remove_track_keeps_stream() {
        let registry = DeviceStreamRegistry::new();
        let platform = ScriptedPlatform::new();
        registry.record_active_stream("s1", stream("s1", &["v1", "v2"]), None);

        registry
            .remove_track("s1", "v1", &platform)
            .await
            .expect("known track");
        assert_eq!(
            platform.removed_tracks(),
            vec![("s1".to_string(), "v1".to_string())]
        );
        let remaining = registry.active_stream("s1").expect("still registered");
        assert_eq!(remaining.stream.tracks.len(), 1);
        assert!(platform.stopped_tracks().is_empty());

        let missing = registry.remove_track("s1", "v1", &platform).await;
        assert!(matches!(missing, Err(MediaError::TrackNotFound { .. })));
    }
}
