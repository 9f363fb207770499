//! Shared entity behaviour for Govee lights and switches.

use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::cache::{DeviceCache, ListenerId, StateCallback};
use crate::client::VendorClient;
use crate::config::EntityOptions;
use crate::device::{Device, Source};
use crate::dispatcher::Dispatcher;
use crate::errors::Error;
use crate::poller::{PollHandle, Poller};
use crate::request::TurnOnRequest;

type Result<T> = std::result::Result<T, Error>;

pub const DOMAIN: &str = "govee";
pub const MANUFACTURER: &str = "Govee";
pub const VIA_DEVICE: &str = "Govee API (cloud)";

/// Device registry information for the host platform.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DeviceInfo {
    pub identifiers: Vec<(String, String)>,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub via_device: (String, String),
}

/// One Govee device as seen by the platform.
///
/// Properties are read from the shared cache on every call; writes go
/// through the [`Dispatcher`]. Nothing here blocks on the network except the
/// async command and update methods.
pub struct Entity<C> {
    unique_id: String,
    device_id: String,
    name: String,
    model: String,
    options: EntityOptions,
    client: Arc<C>,
    cache: Arc<DeviceCache>,
    dispatcher: Dispatcher<C>,
}

impl<C: VendorClient> Entity<C> {
    pub fn new(
        title: &str,
        device: &Device,
        options: EntityOptions,
        client: Arc<C>,
        cache: Arc<DeviceCache>,
    ) -> Self {
        let dispatcher = Dispatcher::new(Arc::clone(&client), Arc::clone(&cache));
        Entity {
            unique_id: format!("{DOMAIN}_{title}_{}", device.id),
            device_id: device.id.clone(),
            name: device.name.clone(),
            model: device.model.clone(),
            options,
            client,
            cache,
            dispatcher,
        }
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Govee's own identifier for the device.
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            identifiers: vec![(DOMAIN.to_string(), self.unique_id.clone())],
            name: self.name.clone(),
            manufacturer: MANUFACTURER.to_string(),
            model: self.model.clone(),
            via_device: (DOMAIN.to_string(), VIA_DEVICE.to_string()),
        }
    }

    pub fn is_on(&self) -> bool {
        self.read(|d| d.power().is_on()).unwrap_or(false)
    }

    pub fn available(&self) -> bool {
        self.read(|d| d.online).unwrap_or(false)
    }

    /// True only when enabled in the options and the state was not read
    /// back from the device.
    pub fn assumed_state(&self) -> bool {
        self.options.use_assumed_state
            && self.read(|d| d.source == Source::History).unwrap_or(false)
    }

    pub fn options(&self) -> &EntityOptions {
        &self.options
    }

    pub async fn turn_on(&self, request: TurnOnRequest) {
        let params = request.to_params();
        debug!("turn_on for Govee device {}, params: {}", self.device_id, params);

        let result = self.dispatcher.update(&self.device_id, &request).await;

        if !request.unknown().is_empty() {
            debug!(
                "turn_on doesn't know how to handle params: {:?}",
                request.unknown()
            );
        }
        if let Err(err) = result {
            warn!(
                "Govee turn_on failed with '{}' for {}, params: {}",
                err, self.device_id, params
            );
        }
    }

    pub async fn turn_off(&self) {
        debug!("turn_off for Govee device {}", self.device_id);
        if let Err(err) = self.dispatcher.turn_off(&self.device_id).await {
            warn!("Govee turn_off failed with '{}' for {}", err, self.device_id);
        }
    }

    /// Refresh now. An `Err` is the recoverable "update failed" signal.
    pub async fn update(&self) -> Result<()> {
        debug!("update for Govee device {}", self.device_id);
        self.poller().poll_once().await
    }

    /// Start the periodic refresh; call once when the entity is registered.
    pub fn start_polling(&self) -> PollHandle {
        self.poller().start()
    }

    pub fn subscribe(&self, callback: StateCallback) -> ListenerId {
        self.cache.subscribe(&self.device_id, callback)
    }

    pub fn unsubscribe(&self, listener: ListenerId) {
        self.cache.unsubscribe(&self.device_id, listener);
    }

    /// Returns diagnostics including the cached state and recent history.
    pub fn diagnostics(&self) -> Value {
        let history = self.cache.history();
        let recent: Vec<_> = history.for_device(&self.device_id).cloned().collect();
        json!({
            "unique_id": self.unique_id,
            "device": self.cache.get(&self.device_id),
            "assumed_state": self.assumed_state(),
            "poll_interval_secs": self.options.poll_interval.as_secs(),
            "history": history.summary(),
            "recent": recent,
        })
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&Device) -> R) -> Option<R> {
        self.cache.read(&self.device_id, f)
    }

    fn poller(&self) -> Poller<C> {
        Poller::new(
            Arc::clone(&self.client),
            Arc::clone(&self.cache),
            &self.device_id,
            self.options.poll_interval,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::Map;

    use super::*;
    use crate::client::mock::{Call, MockClient, bulb};

    fn entity(options: EntityOptions) -> (MockClient, Entity<MockClient>) {
        let client = MockClient::new(vec![bulb("a")]);
        let cache = Arc::new(DeviceCache::new(vec![bulb("a")]));
        let entity = Entity::new("Home", &bulb("a"), options, Arc::new(client.clone()), cache);
        (client, entity)
    }

    #[test]
    fn test_identity() {
        let (_, entity) = entity(EntityOptions::default());
        assert_eq!(entity.unique_id(), "govee_Home_a");
        assert_eq!(entity.name(), "Bulb a");
        let info = entity.device_info();
        assert_eq!(info.manufacturer, "Govee");
        assert_eq!(info.model, "H6159");
        assert_eq!(info.via_device.1, "Govee API (cloud)");
        assert_eq!(info.identifiers, [("govee".to_string(), "govee_Home_a".to_string())]);
    }

    #[tokio::test]
    async fn test_assumed_state_needs_option_and_history() {
        let (_, enabled) = entity(EntityOptions::default());
        assert!(!enabled.assumed_state());
        enabled.turn_on(TurnOnRequest::new()).await;
        assert!(enabled.assumed_state());
        enabled.update().await.unwrap();
        assert!(!enabled.assumed_state());

        let (_, disabled) = entity(EntityOptions {
            use_assumed_state: false,
            ..Default::default()
        });
        disabled.turn_on(TurnOnRequest::new()).await;
        assert!(!disabled.assumed_state());
    }

    #[tokio::test]
    async fn test_turn_on_swallows_errors() {
        let (client, entity) = entity(EntityOptions::default());
        client.fail("turn_on", "boom");
        entity.turn_on(TurnOnRequest::new()).await;
        assert!(!entity.is_on());
        assert_eq!(client.calls(), [Call::TurnOn("a".into())]);
    }

    #[tokio::test]
    async fn test_unknown_params_are_ignored() {
        let (client, entity) = entity(EntityOptions::default());
        let mut params = Map::new();
        params.insert("flash".into(), json!("short"));
        entity.turn_on(TurnOnRequest::from_params(params)).await;
        assert_eq!(client.calls(), [Call::TurnOn("a".into())]);
        assert!(entity.is_on());
    }

    #[tokio::test]
    async fn test_update_failed_marks_unavailable() {
        let (client, entity) = entity(EntityOptions::default());
        assert!(entity.available());
        client.fail("refresh_device_state", "down");
        assert!(entity.update().await.is_err());
        assert!(!entity.available());
    }

    #[tokio::test]
    async fn test_subscribers_see_writes() {
        let (_, entity) = entity(EntityOptions::default());
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let listener = entity.subscribe(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        entity.turn_off().await;
        entity.update().await.unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        entity.unsubscribe(listener);
        entity.turn_off().await;
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_diagnostics() {
        let (client, entity) = entity(EntityOptions::default());
        client.fail("turn_off", "nope");
        entity.turn_off().await;

        let diag = entity.diagnostics();
        assert_eq!(diag["unique_id"], "govee_Home_a");
        assert_eq!(diag["device"]["id"], "a");
        assert_eq!(diag["poll_interval_secs"], 10);
        assert_eq!(diag["history"]["error_count"], 1);
        assert_eq!(diag["recent"].as_array().unwrap().len(), 2);
    }
}
