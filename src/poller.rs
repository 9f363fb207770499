//! Periodic state refresh for a single device.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::{debug, warn};
use serde_json::Value;

use crate::cache::DeviceCache;
use crate::client::VendorClient;
use crate::errors::Error;
use crate::history::EventType;
use crate::runtime::{self, TaskHandle};

type Result<T> = std::result::Result<T, Error>;

/// Refreshes one device from the API on a fixed interval.
///
/// A failed refresh is not retried before the next tick. It marks the
/// device offline, records the error and otherwise keeps the last known state.
pub struct Poller<C> {
    client: Arc<C>,
    cache: Arc<DeviceCache>,
    device_id: String,
    interval: Duration,
}

impl<C: VendorClient> Poller<C> {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

    pub fn new(
        client: Arc<C>,
        cache: Arc<DeviceCache>,
        device_id: &str,
        interval: Duration,
    ) -> Self {
        Poller {
            client,
            cache,
            device_id: device_id.to_string(),
            interval,
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Refresh the device once.
    ///
    /// Returns [`Error::UpdateFailed`] when the API call itself fails. A
    /// device-level error reported alongside fresh state is only logged.
    pub async fn poll_once(&self) -> Result<()> {
        let writer = self.cache.lock(&self.device_id).await?;
        let mut device = writer.snapshot();
        self.cache.record(
            EventType::Poll,
            &self.device_id,
            "refresh_device_state",
            Value::Null,
        );

        match self.client.refresh_device_state(&mut device).await {
            Ok(()) => {
                if let Some(err) = &device.error {
                    warn!("Update failed for {}: {}", device.id, err);
                }
                writer.replace(device);
                Ok(())
            }
            Err(e) => {
                self.cache.record_error(&self.device_id, "refresh_device_state", &e);
                writer.modify(|d| d.mark_failed(&e.to_string()));
                let err = Error::update_failed(&self.device_id, &e);
                warn!("{err}");
                Err(err)
            }
        }
    }

    /// Spawn the polling task. The first refresh happens right away.
    pub fn start(self) -> PollHandle {
        let device_id = self.device_id.clone();
        let stop = Arc::new(AtomicBool::new(false));
        let stopped = Arc::clone(&stop);

        let task = runtime::spawn(async move {
            debug!("Polling {} every {:?}", self.device_id, self.interval);
            while !stopped.load(Ordering::SeqCst) {
                if let Err(err) = self.poll_once().await {
                    debug!("Retrying {} on the next tick: {err}", self.device_id);
                }
                runtime::sleep(self.interval).await;
            }
            debug!("Polling stopped for {}", self.device_id);
        });

        PollHandle {
            device_id,
            stop,
            task: Some(task),
        }
    }
}

/// Handle to a running [`Poller`] task.
///
/// Polling stops when the handle is dropped.
pub struct PollHandle {
    device_id: String,
    stop: Arc<AtomicBool>,
    task: Option<runtime::JoinHandle>,
}

impl PollHandle {
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Stop polling. A refresh already in flight may be dropped.
    pub fn cancel(self) {
        debug!("Cancelling poller for {}", self.device_id);
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
