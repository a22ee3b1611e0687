//! Configuration types and defaults

use camgate_core::{BrowserFamilyTable, CoreError, DEFAULT_BROWSER_DENIED_THRESHOLD};
use camgate_media::CameraConstraints;
use std::time::Duration;

/// Camera permission handler configuration
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    /// Failures at or below this duration are diagnosed as browser-level denials
    pub browser_denied_threshold: Duration,
    /// Browser families that need the browser's own permission button after a reload
    pub reload_button_rules: BrowserFamilyTable,
    /// Constraints used when `start_camera` is called without any
    pub default_constraints: CameraConstraints,
    /// Give up on hardware requests after this long
    pub capture_timeout: Option<Duration>,
    /// Refuse to start when enumeration finds no camera
    pub require_devices: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            browser_denied_threshold: DEFAULT_BROWSER_DENIED_THRESHOLD,
            reload_button_rules: BrowserFamilyTable::default(),
            default_constraints: CameraConstraints::global_ideal(),
            capture_timeout: None,
            require_devices: true,
        }
    }
}

impl HandlerConfig {
    /// Set the browser-level denial threshold
    pub fn with_browser_denied_threshold(mut self, threshold: Duration) -> Self {
        self.browser_denied_threshold = threshold;
        self
    }

    /// Replace the reload button rules
    pub fn with_reload_button_rules(mut self, rules: BrowserFamilyTable) -> Self {
        self.reload_button_rules = rules;
        self
    }

    /// Replace the default constraints
    pub fn with_default_constraints(mut self, constraints: CameraConstraints) -> Self {
        self.default_constraints = constraints;
        self
    }

    /// Set the hardware request timeout
    pub fn with_capture_timeout(mut self, timeout: Duration) -> Self {
        self.capture_timeout = Some(timeout);
        self
    }

    /// Whether an empty camera list stops a start cycle
    pub fn with_require_devices(mut self, require: bool) -> Self {
        self.require_devices = require;
        self
    }

    /// Check the configuration for values the handler cannot work with
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.browser_denied_threshold.is_zero() {
            return Err(CoreError::InvalidConfiguration {
                field: "browser_denied_threshold".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.capture_timeout.is_some_and(|t| t.is_zero()) {
            return Err(CoreError::InvalidConfiguration {
                field: "capture_timeout".to_string(),
                reason: "must be greater than zero when set".to_string(),
            });
        }
        Ok(())
    }
}
