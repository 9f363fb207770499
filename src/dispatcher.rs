//! Translates entity-level changes into Govee API commands.

use std::sync::Arc;

use log::debug;
use serde_json::{Value, json};

use crate::cache::{DeviceCache, DeviceWriter};
use crate::client::VendorClient;
use crate::device::Device;
use crate::errors::Error;
use crate::history::EventType;
use crate::request::TurnOnRequest;
use crate::types::{Brightness, Color, HueSaturation, Kelvin, PowerMode};

type Result<T> = std::result::Result<T, Error>;

/// Sends commands for devices in a [`DeviceCache`] and writes the outcome back.
///
/// Each command holds the device's write lock for its whole round trip. On
/// success the cache gets an optimistic update marked as history; on failure
/// the cache is left alone. Listeners are notified either way.
pub struct Dispatcher<C> {
    client: Arc<C>,
    cache: Arc<DeviceCache>,
}

impl<C> Clone for Dispatcher<C> {
    fn clone(&self) -> Self {
        Dispatcher {
            client: Arc::clone(&self.client),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<C: VendorClient> Dispatcher<C> {
    pub fn new(client: Arc<C>, cache: Arc<DeviceCache>) -> Self {
        Dispatcher { client, cache }
    }

    pub async fn turn_on(&self, id: &str) -> Result<()> {
        let writer = self.cache.lock(id).await?;
        self.power(&writer, PowerMode::On).await
    }

    pub async fn turn_off(&self, id: &str) -> Result<()> {
        let writer = self.cache.lock(id).await?;
        self.power(&writer, PowerMode::Off).await
    }

    /// `brightness` is on the platform scale (1-255).
    pub async fn set_brightness(&self, id: &str, brightness: u8) -> Result<()> {
        let writer = self.cache.lock(id).await?;
        self.brightness(&writer, Brightness::from_platform(brightness)).await
    }

    pub async fn set_color(&self, id: &str, hs: &HueSaturation) -> Result<()> {
        let writer = self.cache.lock(id).await?;
        self.color(&writer, hs.to_color()).await
    }

    /// `mireds` is converted to Kelvin and clamped to the supported range.
    pub async fn set_color_temperature(&self, id: &str, mireds: u32) -> Result<()> {
        let writer = self.cache.lock(id).await?;
        self.color_temp(&writer, Kelvin::from_mireds(mireds)).await
    }

    /// Apply a combined request: color, then brightness, then color
    /// temperature, each as its own API call. With none of those present the
    /// device is simply turned on.
    ///
    /// Every step runs even if an earlier one failed. Only the last error
    /// encountered is returned, so an earlier failure is hidden when a later
    /// step fails too.
    pub async fn update(&self, id: &str, request: &TurnOnRequest) -> Result<()> {
        let writer = self.cache.lock(id).await?;
        let mut last_error = None;

        if let Some(hs) = request.get_hs_color() {
            if let Err(e) = self.color(&writer, hs.to_color()).await {
                last_error = Some(e);
            }
        }
        if let Some(brightness) = request.get_brightness() {
            if let Err(e) = self
                .brightness(&writer, Brightness::from_platform(brightness))
                .await
            {
                last_error = Some(e);
            }
        }
        if let Some(mireds) = request.get_color_temp() {
            if let Err(e) = self.color_temp(&writer, Kelvin::from_mireds(mireds)).await {
                last_error = Some(e);
            }
        }
        if request.is_plain_turn_on() {
            if let Err(e) = self.power(&writer, PowerMode::On).await {
                last_error = Some(e);
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn power(&self, writer: &DeviceWriter<'_>, power: PowerMode) -> Result<()> {
        let device = writer.snapshot();
        let result = match power {
            PowerMode::On => self.client.turn_on(&device).await,
            PowerMode::Off => self.client.turn_off(&device).await,
        };
        let method = match power {
            PowerMode::On => "turn_on",
            PowerMode::Off => "turn_off",
        };
        self.finish(writer, &device, method, Value::Null, result, |d| {
            d.apply_power(power)
        })
    }

    async fn brightness(&self, writer: &DeviceWriter<'_>, brightness: Brightness) -> Result<()> {
        let device = writer.snapshot();
        let result = self.client.set_brightness(&device, brightness).await;
        let params = json!({"brightness": brightness.native()});
        self.finish(writer, &device, "set_brightness", params, result, |d| {
            d.apply_brightness(brightness)
        })
    }

    async fn color(&self, writer: &DeviceWriter<'_>, color: Color) -> Result<()> {
        let device = writer.snapshot();
        let result = self.client.set_color(&device, color).await;
        let params = json!({"color": color});
        self.finish(writer, &device, "set_color", params, result, |d| {
            d.apply_color(color)
        })
    }

    async fn color_temp(&self, writer: &DeviceWriter<'_>, kelvin: Kelvin) -> Result<()> {
        let device = writer.snapshot();
        let result = self.client.set_color_temperature(&device, kelvin).await;
        let params = json!({"color_temp": kelvin.kelvin()});
        self.finish(writer, &device, "set_color_temperature", params, result, |d| {
            d.apply_color_temp(kelvin)
        })
    }

    fn finish(
        &self,
        writer: &DeviceWriter<'_>,
        device: &Device,
        method: &str,
        params: Value,
        result: Result<()>,
        apply: impl FnOnce(&mut Device),
    ) -> Result<()> {
        debug!("{method} for Govee device {}: {params}", device.id);
        self.cache.record(EventType::Command, &device.id, method, params);

        match result {
            Ok(()) => {
                writer.modify(apply);
                Ok(())
            }
            Err(e) => {
                debug!("{method} failed for {}: {e}", device.id);
                self.cache.record_error(&device.id, method, &e);
                writer.touch();
                Err(e)
            }
        }
    }
}
