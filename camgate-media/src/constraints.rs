//! Camera request constraints
//!
//! A serialisable model of the constraint dictionary passed to the platform's
//! stream request, plus the merge rules used when a specific device is asked for.

use serde::{Deserialize, Serialize};

/// Video resolution information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoResolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl VideoResolution {
    /// Create a resolution
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Portrait 720p as requested from mobile cameras
    pub const PORTRAIT_720P: Self = Self::new(720, 1280);
}

/// A constraint value that is either a preference or a requirement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Constrain<T> {
    /// Preferred value; the platform may pick something else
    Ideal(T),
    /// Required value; the request fails if it cannot be met
    Exact(T),
}

impl<T> Constrain<T> {
    /// The wrapped value
    pub fn value(&self) -> &T {
        match self {
            Constrain::Ideal(value) | Constrain::Exact(value) => value,
        }
    }
}

/// Direction a camera faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Towards the user
    User,
    /// Away from the user
    Environment,
}

/// Constraints for the video part of a request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoConstraints {
    /// Device to open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<Constrain<String>>,
    /// Frame width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Constrain<u32>>,
    /// Frame height
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Constrain<u32>>,
    /// Camera direction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facing_mode: Option<Constrain<FacingMode>>,
    /// Frames per second
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<Constrain<f64>>,
}

impl VideoConstraints {
    /// Ideal constraints used when the caller supplies none
    pub fn global_ideal() -> Self {
        let resolution = VideoResolution::PORTRAIT_720P;
        Self {
            device_id: None,
            width: Some(Constrain::Ideal(resolution.width)),
            height: Some(Constrain::Ideal(resolution.height)),
            facing_mode: Some(Constrain::Ideal(FacingMode::Environment)),
            frame_rate: Some(Constrain::Ideal(60.0)),
        }
    }

    /// Require a specific device, keeping every other constraint
    pub fn with_exact_device(mut self, device_id: &str) -> Self {
        self.device_id = Some(Constrain::Exact(device_id.to_string()));
        self
    }
}

/// Video part of a request: a plain switch or a constraint set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VideoRequest {
    /// `video: true` / `video: false`
    Enabled(bool),
    /// `video: { .. }`
    Constrained(VideoConstraints),
}

/// Constraint dictionary for one stream request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConstraints {
    /// Video request
    pub video: VideoRequest,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self::global_ideal()
    }
}

impl CameraConstraints {
    /// Request any camera with no further constraints
    pub fn any_camera() -> Self {
        Self {
            video: VideoRequest::Enabled(true),
        }
    }

    /// Request with the global ideal constraints
    pub fn global_ideal() -> Self {
        Self {
            video: VideoRequest::Constrained(VideoConstraints::global_ideal()),
        }
    }

    /// Request with an explicit constraint set
    pub fn constrained(video: VideoConstraints) -> Self {
        Self {
            video: VideoRequest::Constrained(video),
        }
    }

    /// Build the request for `device_id` from caller constraints or the defaults.
    ///
    /// A boolean video request becomes an exact device request when an id is
    /// given and `video: true` otherwise. A constraint set gets the id merged
    /// in as an exact device constraint and is passed through unchanged when
    /// no id is given. Without caller constraints the
    /// `defaults` are used with the same merge.
    pub fn resolve(
        device_id: Option<&str>,
        requested: Option<&CameraConstraints>,
        defaults: &CameraConstraints,
    ) -> CameraConstraints {
        let base = requested.unwrap_or(defaults);
        match (&base.video, device_id) {
            (VideoRequest::Enabled(_), Some(id)) => {
                Self::constrained(VideoConstraints::default().with_exact_device(id))
            }
            (VideoRequest::Enabled(_), None) => Self::any_camera(),
            (VideoRequest::Constrained(video), Some(id)) => {
                Self::constrained(video.clone().with_exact_device(id))
            }
            (VideoRequest::Constrained(_), None) => base.clone(),
        }
    }

    /// Device explicitly required by this request
    pub fn exact_device(&self) -> Option<&str> {
        match &self.video {
            VideoRequest::Constrained(VideoConstraints {
                device_id: Some(Constrain::Exact(id)),
                ..
            }) => Some(id.as_str()),
            _ => None,
        }
    }
}
