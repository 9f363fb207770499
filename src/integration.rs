//! Setup and teardown of one configured Govee account.

use std::path::Path;
use std::sync::Arc;

use futures::future::join_all;
use log::{debug, info, warn};

use crate::cache::DeviceCache;
use crate::client::{Connector, VendorClient};
use crate::config::ConfigEntry;
use crate::device::EntityKind;
use crate::entity::Entity;
use crate::errors::Error;
use crate::learning::LearningStorage;
use crate::light::LightEntity;
use crate::poller::PollHandle;
use crate::switch::SwitchEntity;

type Result<T> = std::result::Result<T, Error>;

fn log_online(online: bool) {
    if online {
        warn!("API is back online.");
    } else {
        warn!("API is offline.");
    }
}

/// A running integration: the API connection, the device cache and every
/// entity built from it.
///
/// Dropping an `Integration` stops its pollers but, without
/// [`Integration::unload`], leaves the connection open.
pub struct Integration<C> {
    entry: ConfigEntry,
    client: Arc<C>,
    cache: Arc<DeviceCache>,
    lights: Vec<LightEntity<C>>,
    switches: Vec<SwitchEntity<C>>,
    pollers: Vec<PollHandle>,
}

impl<C: VendorClient> Integration<C> {
    /// Connect, list devices and start polling every exposed device.
    ///
    /// Any failure before the device list is known yields
    /// [`Error::NotReady`]; the host should retry later.
    pub async fn setup_entry<K>(
        connector: &K,
        entry: ConfigEntry,
        config_dir: &Path,
    ) -> Result<Self>
    where
        K: Connector<Client = C>,
    {
        let learning = LearningStorage::new(config_dir);
        let client = connector
            .connect(entry.api_key(), learning)
            .await
            .map_err(|err| {
                warn!("Could not connect to Govee API: {err}");
                Error::NotReady(err.to_string())
            })?;

        client.subscribe_online(Box::new(log_online));

        let devices = match client.list_devices().await {
            Ok(devices) => devices,
            Err(err) => {
                warn!("Could not connect to Govee API: {err}");
                client.close().await;
                return Err(Error::NotReady(err.to_string()));
            }
        };

        let client = Arc::new(client);
        let cache = Arc::new(DeviceCache::new(devices.clone()));
        let options = entry.entity_options();
        let mut lights = Vec::new();
        let mut switches = Vec::new();

        for device in &devices {
            let entity = Entity::new(
                &entry.title,
                device,
                options,
                Arc::clone(&client),
                Arc::clone(&cache),
            );
            match device.capabilities.entity_kind() {
                Some(EntityKind::Light) => lights.push(LightEntity::new(entity)),
                Some(EntityKind::Switch) => switches.push(SwitchEntity::new(entity)),
                None => debug!("Skipping {} ({}): no usable capabilities", device.name, device.id),
            }
        }

        let pollers = lights
            .iter()
            .map(|l| l.entity())
            .chain(switches.iter().map(|s| s.entity()))
            .map(Entity::start_polling)
            .collect();

        info!(
            "Govee entry {} ready with {} lights and {} switches",
            entry.title,
            lights.len(),
            switches.len()
        );

        Ok(Integration {
            entry,
            client,
            cache,
            lights,
            switches,
            pollers,
        })
    }

    pub fn entry(&self) -> &ConfigEntry {
        &self.entry
    }

    pub fn cache(&self) -> &Arc<DeviceCache> {
        &self.cache
    }

    pub fn lights(&self) -> &[LightEntity<C>] {
        &self.lights
    }

    pub fn switches(&self) -> &[SwitchEntity<C>] {
        &self.switches
    }

    /// Refresh every entity concurrently. Returns the failures, keyed by device id.
    pub async fn refresh_all(&self) -> Vec<(String, Error)> {
        let entities: Vec<&Entity<C>> = self
            .lights
            .iter()
            .map(|l| l.entity())
            .chain(self.switches.iter().map(|s| s.entity()))
            .collect();

        let results = join_all(entities.iter().map(|e| e.update())).await;

        entities
            .iter()
            .zip(results)
            .filter_map(|(e, r)| r.err().map(|err| (e.device_id().to_string(), err)))
            .collect()
    }

    /// Stop every poller and close the connection. Commands already in
    /// flight are left to finish on their own.
    pub async fn unload(self) {
        debug!("Unloading Govee entry {}", self.entry.title);
        for poller in self.pollers {
            poller.cancel();
        }
        self.client.close().await;
    }
}
