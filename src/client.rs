//! Boundary to the Govee cloud API client.
//!
//! HTTP transport, authentication, retry and rate limiting all live behind
//! these traits. The integration only ever talks to a [`VendorClient`] it was
//! handed explicitly.

use std::future::Future;

use crate::device::Device;
use crate::errors::Error;
use crate::learning::LearningStorage;
use crate::types::{Brightness, Color, Kelvin};

type Result<T> = std::result::Result<T, Error>;

/// Called with `true` when the API comes back online and `false` when it goes away.
pub type OnlineCallback = Box<dyn Fn(bool) + Send + Sync + 'static>;

/// An open connection to the Govee API.
///
/// Command methods report failure as an `Err` value; none of them touch the
/// caller's device snapshot. `refresh_device_state` writes the fresh state into
/// the device it is given and may set `device.error` for partial failures
/// while still returning `Ok`.
pub trait VendorClient: Send + Sync + 'static {
    /// List every device on the account. An error means the whole fetch failed.
    fn list_devices(&self) -> impl Future<Output = Result<Vec<Device>>> + Send;

    fn refresh_device_state(&self, device: &mut Device)
    -> impl Future<Output = Result<()>> + Send;

    fn turn_on(&self, device: &Device) -> impl Future<Output = Result<()>> + Send;

    fn turn_off(&self, device: &Device) -> impl Future<Output = Result<()>> + Send;

    fn set_brightness(
        &self,
        device: &Device,
        brightness: Brightness,
    ) -> impl Future<Output = Result<()>> + Send;

    fn set_color(&self, device: &Device, color: Color) -> impl Future<Output = Result<()>> + Send;

    fn set_color_temperature(
        &self,
        device: &Device,
        kelvin: Kelvin,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Release the connection. Calling it twice is harmless.
    fn close(&self) -> impl Future<Output = ()> + Send;

    fn subscribe_online(&self, callback: OnlineCallback);
}

/// Opens [`VendorClient`] connections.
pub trait Connector {
    type Client: VendorClient;

    fn connect(
        &self,
        api_key: &str,
        learning: LearningStorage,
    ) -> impl Future<Output = Result<Self::Client>> + Send;
}

#[cfg(test)]
pub(crate) mod mock {
    //! In-memory client that records every call.

    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::device::{Capabilities, Source};
    use crate::runtime;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        ListDevices,
        Refresh(String),
        TurnOn(String),
        TurnOff(String),
        SetBrightness(String, u8),
        SetColor(String, Color),
        SetColorTemperature(String, u32),
    }

    impl Call {
        fn method(&self) -> &'static str {
            match self {
                Call::ListDevices => "list_devices",
                Call::Refresh(_) => "refresh_device_state",
                Call::TurnOn(_) => "turn_on",
                Call::TurnOff(_) => "turn_off",
                Call::SetBrightness(..) => "set_brightness",
                Call::SetColor(..) => "set_color",
                Call::SetColorTemperature(..) => "set_color_temperature",
            }
        }
    }

    #[derive(Default)]
    struct MockInner {
        devices: Mutex<Vec<Device>>,
        calls: Mutex<Vec<Call>>,
        trace: Mutex<Vec<String>>,
        failures: Mutex<HashMap<&'static str, String>>,
        delays: Mutex<HashMap<&'static str, Duration>>,
        online: Mutex<Vec<OnlineCallback>>,
        closed: AtomicUsize,
    }

    /// Cheap to clone; clones share the same fake account.
    #[derive(Clone, Default)]
    pub struct MockClient {
        inner: Arc<MockInner>,
    }

    pub fn bulb(id: &str) -> Device {
        Device::new(
            id,
            &format!("Bulb {id}"),
            "H6159",
            Capabilities {
                brightness: true,
                color: true,
                color_temp: true,
                turn: true,
            },
        )
    }

    pub fn plug(id: &str) -> Device {
        Device::new(
            id,
            &format!("Plug {id}"),
            "H5080",
            Capabilities {
                turn: true,
                ..Default::default()
            },
        )
    }

    impl MockClient {
        pub fn new(devices: Vec<Device>) -> Self {
            let client = MockClient::default();
            *client.inner.devices.lock().unwrap() = devices;
            client
        }

        pub fn fail(&self, method: &'static str, msg: &str) {
            self.inner
                .failures
                .lock()
                .unwrap()
                .insert(method, msg.to_string());
        }

        pub fn delay(&self, method: &'static str, duration: Duration) {
            self.inner.delays.lock().unwrap().insert(method, duration);
        }

        pub fn calls(&self) -> Vec<Call> {
            self.inner.calls.lock().unwrap().clone()
        }

        pub fn trace(&self) -> Vec<String> {
            self.inner.trace.lock().unwrap().clone()
        }

        pub fn closed(&self) -> usize {
            self.inner.closed.load(Ordering::SeqCst)
        }

        /// Change what the next refresh of `id` will read back.
        pub fn edit_device(&self, id: &str, edit: impl FnOnce(&mut Device)) {
            let mut devices = self.inner.devices.lock().unwrap();
            if let Some(device) = devices.iter_mut().find(|d| d.id == id) {
                edit(device);
            }
        }

        /// Returns how many subscribers were called.
        pub fn emit_online(&self, online: bool) -> usize {
            let callbacks = self.inner.online.lock().unwrap();
            for callback in callbacks.iter() {
                callback(online);
            }
            callbacks.len()
        }

        pub fn online_subscribers(&self) -> usize {
            self.inner.online.lock().unwrap().len()
        }

        async fn run(&self, call: Call) -> Result<()> {
            let method = call.method();
            self.inner.calls.lock().unwrap().push(call);
            self.inner.trace.lock().unwrap().push(format!("{method}:start"));

            let delay = self.inner.delays.lock().unwrap().get(method).copied();
            if let Some(delay) = delay {
                runtime::sleep(delay).await;
            }

            self.inner.trace.lock().unwrap().push(format!("{method}:end"));
            match self.inner.failures.lock().unwrap().get(method) {
                Some(msg) => Err(Error::api(msg.as_str())),
                None => Ok(()),
            }
        }
    }

    impl VendorClient for MockClient {
        async fn list_devices(&self) -> Result<Vec<Device>> {
            self.run(Call::ListDevices).await?;
            Ok(self.inner.devices.lock().unwrap().clone())
        }

        async fn refresh_device_state(&self, device: &mut Device) -> Result<()> {
            self.run(Call::Refresh(device.id.clone())).await?;
            let devices = self.inner.devices.lock().unwrap();
            if let Some(truth) = devices.iter().find(|d| d.id == device.id) {
                *device = truth.clone();
                device.source = Source::Live;
            }
            Ok(())
        }

        async fn turn_on(&self, device: &Device) -> Result<()> {
            self.run(Call::TurnOn(device.id.clone())).await?;
            self.edit_device(&device.id, |d| d.power_state = true);
            Ok(())
        }

        async fn turn_off(&self, device: &Device) -> Result<()> {
            self.run(Call::TurnOff(device.id.clone())).await?;
            self.edit_device(&device.id, |d| d.power_state = false);
            Ok(())
        }

        async fn set_brightness(&self, device: &Device, brightness: Brightness) -> Result<()> {
            self.run(Call::SetBrightness(device.id.clone(), brightness.native()))
                .await?;
            self.edit_device(&device.id, |d| d.brightness = brightness.native());
            Ok(())
        }

        async fn set_color(&self, device: &Device, color: Color) -> Result<()> {
            self.run(Call::SetColor(device.id.clone(), color)).await?;
            self.edit_device(&device.id, |d| d.color = color);
            Ok(())
        }

        async fn set_color_temperature(&self, device: &Device, kelvin: Kelvin) -> Result<()> {
            self.run(Call::SetColorTemperature(device.id.clone(), kelvin.kelvin()))
                .await?;
            self.edit_device(&device.id, |d| d.color_temp = kelvin.kelvin());
            Ok(())
        }

        async fn close(&self) {
            self.inner.closed.fetch_add(1, Ordering::SeqCst);
        }

        fn subscribe_online(&self, callback: OnlineCallback) {
            self.inner.online.lock().unwrap().push(callback);
        }
    }

    #[derive(Default)]
    pub struct MockConnector {
        pub client: MockClient,
        pub error: Option<String>,
        pub connected: Mutex<Vec<(String, PathBuf)>>,
    }

    impl MockConnector {
        pub fn new(client: MockClient) -> Self {
            MockConnector {
                client,
                ..Default::default()
            }
        }
    }

    impl Connector for MockConnector {
        type Client = MockClient;

        async fn connect(&self, api_key: &str, learning: LearningStorage) -> Result<MockClient> {
            if let Some(msg) = &self.error {
                return Err(Error::api(msg.as_str()));
            }
            self.connected
                .lock()
                .unwrap()
                .push((api_key.to_string(), learning.path().to_path_buf()));
            Ok(self.client.clone())
        }
    }
}
