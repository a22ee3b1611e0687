//! Event system for device, permission and log notifications
//!
//! Listeners are invoked synchronously, in registration order, on the task
//! that emits. Each event is a marker type whose payload type is fixed, so a
//! listener can only be registered with the payload it will receive.

use camgate_core::{MediaDeviceInfo, PermissionSnapshot};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type Listener<P> = Arc<dyn Fn(&P) + Send + Sync>;
type Listeners<P> = RwLock<Vec<Listener<P>>>;

/// An event a [`CameraPermissionHandler`](crate::CameraPermissionHandler) can emit
pub trait HandlerEvent: Copy + Send + Sync + 'static {
    /// Data handed to listeners
    type Payload: Send + Sync + 'static;

    /// Event name as used in logs
    const NAME: &'static str;

    /// Listener list of this event inside `notifier`
    #[doc(hidden)]
    fn listeners(notifier: &EventNotifier) -> &Listeners<Self::Payload>;
}

/// The known camera list changed; payload is the full registry snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceListUpdated;

/// A diagnostic log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Log;

/// The camera permission changed; payload is a fresh snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionStatusChanged;

impl HandlerEvent for DeviceListUpdated {
    type Payload = Vec<MediaDeviceInfo>;
    const NAME: &'static str = "device-list-updated";

    fn listeners(notifier: &EventNotifier) -> &Listeners<Self::Payload> {
        &notifier.device_list_updated
    }
}

impl HandlerEvent for Log {
    type Payload = String;
    const NAME: &'static str = "log";

    fn listeners(notifier: &EventNotifier) -> &Listeners<Self::Payload> {
        &notifier.log
    }
}

impl HandlerEvent for PermissionStatusChanged {
    type Payload = PermissionSnapshot;
    const NAME: &'static str = "permission-status-changed";

    fn listeners(notifier: &EventNotifier) -> &Listeners<Self::Payload> {
        &notifier.permission_status_changed
    }
}

/// Synchronous publish/subscribe list for handler events
#[derive(Default)]
pub struct EventNotifier {
    device_list_updated: Listeners<Vec<MediaDeviceInfo>>,
    log: Listeners<String>,
    permission_status_changed: Listeners<PermissionSnapshot>,
}

impl EventNotifier {
    /// Create a notifier with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `event`
    pub fn on<E, F>(&self, _event: E, listener: F)
    where
        E: HandlerEvent,
        F: Fn(&E::Payload) + Send + Sync + 'static,
    {
        E::listeners(self).write().push(Arc::new(listener));
        debug!(event = E::NAME, "Listener registered");
    }

    /// Invoke every listener of `event` with `payload`
    pub fn emit<E: HandlerEvent>(&self, _event: E, payload: &E::Payload) {
        // Snapshot so listeners may register further listeners
        let listeners: Vec<Listener<E::Payload>> = E::listeners(self).read().clone();
        for listener in &listeners {
            listener(payload);
        }
    }

    /// Emit a `log` event, mirrored to tracing
    pub fn log(&self, message: impl Into<String>) {
        let message = message.into();
        debug!(target: "camgate::log", "{}", message);
        self.emit(Log, &message);
    }

    /// Number of listeners registered for `event`
    pub fn listener_count<E: HandlerEvent>(&self, _event: E) -> usize {
        E::listeners(self).read().len()
    }
}

impl fmt::Debug for EventNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventNotifier")
            .field("device_list_updated", &self.listener_count(DeviceListUpdated))
            .field("log", &self.listener_count(Log))
            .field(
                "permission_status_changed",
                &self.listener_count(PermissionStatusChanged),
            )
            .finish()
    }
}
