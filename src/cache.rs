//! In-memory device state cache.
//!
//! Each device has its own slot: a snapshot that readers copy out of without
//! waiting on network I/O, and an async write lock that a poll or command
//! holds for its whole round trip. Slots are independent, so work on one
//! device never waits on another.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use log::debug;
use serde_json::Value;

use crate::device::Device;
use crate::errors::Error;
use crate::history::{CommandHistory, EventType};
use crate::runtime::{self, MutexGuard};

type Result<T> = std::result::Result<T, Error>;

/// Called with the new snapshot after every write to a device.
pub type StateCallback = Box<dyn Fn(&Device) + Send + Sync + 'static>;

type SharedCallback = Arc<dyn Fn(&Device) + Send + Sync + 'static>;

/// Token returned by [`DeviceCache::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct DeviceSlot {
    writer: runtime::Mutex<()>,
    snapshot: RwLock<Device>,
}

/// Snapshot of every device discovered at setup.
pub struct DeviceCache {
    order: Vec<String>,
    slots: HashMap<String, DeviceSlot>,
    listeners: Mutex<HashMap<String, Vec<(ListenerId, SharedCallback)>>>,
    next_listener: AtomicU64,
    history: Mutex<CommandHistory>,
}

impl DeviceCache {
    pub fn new(devices: Vec<Device>) -> Self {
        let order = devices.iter().map(|d| d.id.clone()).collect();
        let slots = devices
            .into_iter()
            .map(|device| {
                let id = device.id.clone();
                let slot = DeviceSlot {
                    writer: runtime::Mutex::new(()),
                    snapshot: RwLock::new(device),
                };
                (id, slot)
            })
            .collect();

        DeviceCache {
            order,
            slots,
            listeners: Mutex::new(HashMap::new()),
            next_listener: AtomicU64::new(0),
            history: Mutex::new(CommandHistory::new()),
        }
    }

    /// Device ids in discovery order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Copy of the current snapshot.
    pub fn get(&self, id: &str) -> Option<Device> {
        self.read(id, Device::clone)
    }

    /// Read from the snapshot without copying it.
    pub fn read<R>(&self, id: &str, f: impl FnOnce(&Device) -> R) -> Option<R> {
        let slot = self.slots.get(id)?;
        let device = slot.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        Some(f(&*device))
    }

    /// Wait for exclusive write access to one device.
    ///
    /// The returned writer must be held across the whole vendor round trip so
    /// that a poll result and a command's optimistic update never interleave.
    pub async fn lock(&self, id: &str) -> Result<DeviceWriter<'_>> {
        let slot = self
            .slots
            .get(id)
            .ok_or_else(|| Error::DeviceNotFound(id.to_string()))?;
        let guard = slot.writer.lock().await;
        Ok(DeviceWriter {
            cache: self,
            slot,
            _guard: guard,
        })
    }

    pub fn subscribe(&self, id: &str, callback: StateCallback) -> ListenerId {
        let listener = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id.to_string())
            .or_default()
            .push((listener, Arc::from(callback)));
        listener
    }

    pub fn unsubscribe(&self, id: &str, listener: ListenerId) {
        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(callbacks) = listeners.get_mut(id) {
            callbacks.retain(|(l, _)| *l != listener);
        }
    }

    pub fn history(&self) -> CommandHistory {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn record(&self, event_type: EventType, device: &str, method: &str, params: Value) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(event_type, device, method, params);
    }

    pub(crate) fn record_error(&self, device: &str, method: &str, error: &Error) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record_error(device, method, &error.to_string());
    }

    /// Callbacks run after the listener table is released, so they may
    /// subscribe or unsubscribe.
    fn notify(&self, device: &Device) {
        let callbacks: Vec<SharedCallback> = {
            let listeners = self
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let Some(callbacks) = listeners.get(&device.id) else {
                return;
            };
            callbacks.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        debug!("Notifying {} listeners of {}", callbacks.len(), device.id);
        for callback in callbacks {
            callback(device);
        }
    }
}

/// Exclusive write access to one device, see [`DeviceCache::lock`].
pub struct DeviceWriter<'a> {
    cache: &'a DeviceCache,
    slot: &'a DeviceSlot,
    _guard: MutexGuard<'a, ()>,
}

impl DeviceWriter<'_> {
    pub fn snapshot(&self) -> Device {
        self.slot
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Change the snapshot and notify listeners.
    pub fn modify(&self, f: impl FnOnce(&mut Device)) {
        let updated = {
            let mut device = self
                .slot
                .snapshot
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            f(&mut *device);
            device.clone()
        };
        self.cache.notify(&updated);
    }

    pub fn replace(&self, device: Device) {
        self.modify(|current| *current = device);
    }

    /// Notify listeners without changing anything.
    pub fn touch(&self) {
        self.cache.notify(&self.snapshot());
    }
}
