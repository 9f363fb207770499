//! Light entities.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::client::VendorClient;
use crate::convert::{COLOR_TEMP_KELVIN_MAX, COLOR_TEMP_KELVIN_MIN};
use crate::entity::Entity;
use crate::types::{Brightness, Kelvin};

/// Light features advertised to the platform.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct SupportedFeatures {
    pub brightness: bool,
    pub color: bool,
    pub color_temp: bool,
}

impl SupportedFeatures {
    pub const BRIGHTNESS: u32 = 1;
    pub const COLOR_TEMP: u32 = 2;
    pub const COLOR: u32 = 16;

    /// Platform bitmask for these features.
    ///
    /// # Examples
    ///
    /// ```
    /// use govee_hass_rs::SupportedFeatures;
    ///
    /// let all = SupportedFeatures { brightness: true, color: true, color_temp: true };
    /// assert_eq!(all.bits(), 19);
    /// assert_eq!(SupportedFeatures::default().bits(), 0);
    /// ```
    pub fn bits(&self) -> u32 {
        let mut bits = 0;
        if self.brightness {
            bits |= Self::BRIGHTNESS;
        }
        if self.color_temp {
            bits |= Self::COLOR_TEMP;
        }
        if self.color {
            bits |= Self::COLOR;
        }
        bits
    }
}

/// A Govee device with brightness support.
///
/// Color temperatures are reported in mireds and brightness on the
/// platform's 1-255 scale; both are converted from the cached device state
/// on every read.
pub struct LightEntity<C> {
    entity: Entity<C>,
    features: SupportedFeatures,
}

impl<C: VendorClient> LightEntity<C> {
    pub fn new(entity: Entity<C>) -> Self {
        let features = entity
            .read(|d| SupportedFeatures {
                brightness: d.capabilities.brightness,
                color: d.capabilities.color,
                color_temp: d.capabilities.color_temp,
            })
            .unwrap_or_default();
        LightEntity { entity, features }
    }

    pub fn entity(&self) -> &Entity<C> {
        &self.entity
    }

    pub fn supported_features(&self) -> SupportedFeatures {
        self.features
    }

    pub fn brightness(&self) -> Option<u8> {
        self.entity.read(|d| Brightness::from_native(d.brightness).platform())
    }

    pub fn hs_color(&self) -> Option<(f64, f64)> {
        self.entity.read(|d| {
            let hs = d.hs_color();
            (hs.hue(), hs.saturation())
        })
    }

    pub fn rgb_color(&self) -> Option<(u8, u8, u8)> {
        self.entity.read(|d| d.color.as_tuple())
    }

    /// Current color temperature in mireds, `None` while the light shows a color.
    ///
    /// A temperature reported outside the supported range is clamped, so the
    /// result always lies between [`Self::min_mireds`] and [`Self::max_mireds`].
    pub fn color_temp(&self) -> Option<u32> {
        self.entity.read(|d| d.kelvin().map(|k| k.mireds())).flatten()
    }

    /// Coldest supported temperature, in mireds.
    pub fn min_mireds(&self) -> u32 {
        Kelvin::clamped(i64::from(COLOR_TEMP_KELVIN_MAX)).mireds()
    }

    /// Warmest supported temperature, in mireds.
    pub fn max_mireds(&self) -> u32 {
        Kelvin::clamped(i64::from(COLOR_TEMP_KELVIN_MIN)).mireds()
    }
}

impl<C> Deref for LightEntity<C> {
    type Target = Entity<C>;

    fn deref(&self) -> &Entity<C> {
        &self.entity
    }
}
