//! Device snapshot and capability classification.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::types::{Brightness, Color, HueSaturation, Kelvin, PowerMode};

/// Where the last known state of a device came from.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Read back from the device through the API.
    #[default]
    Live,
    /// Remembered from the last command or a fallback; may be stale.
    History,
}

/// Feature flags reported by the Govee API for a device.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub brightness: bool,
    pub color: bool,
    pub color_temp: bool,
    pub turn: bool,
}

/// Kind of platform entity a device is exposed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Light,
    Switch,
}

impl Capabilities {
    /// Decide once, at discovery, which entity class a device becomes.
    ///
    /// Anything dimmable is a light; an on/off-only device is a switch;
    /// devices supporting neither are not exposed.
    ///
    /// # Examples
    ///
    /// ```
    /// use govee_hass_rs::{Capabilities, EntityKind};
    ///
    /// let plug = Capabilities { turn: true, ..Default::default() };
    /// assert_eq!(plug.entity_kind(), Some(EntityKind::Switch));
    ///
    /// let bulb = Capabilities { turn: true, brightness: true, ..Default::default() };
    /// assert_eq!(bulb.entity_kind(), Some(EntityKind::Light));
    ///
    /// assert_eq!(Capabilities::default().entity_kind(), None);
    /// ```
    pub fn entity_kind(&self) -> Option<EntityKind> {
        if self.brightness {
            Some(EntityKind::Light)
        } else if self.turn {
            Some(EntityKind::Switch)
        } else {
            None
        }
    }
}

/// Last known state of a single Govee device.
///
/// The vendor client owns the identity and capability fields; this crate only
/// keeps the snapshot current.
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Device {
    /// Stable device identifier (usually the device MAC).
    pub id: String,
    pub name: String,
    pub model: String,
    pub capabilities: Capabilities,
    pub power_state: bool,
    /// Native scale, 0-254.
    pub brightness: u8,
    pub color: Color,
    /// Kelvin; zero means unset.
    pub color_temp: u32,
    pub online: bool,
    pub source: Source,
    pub error: Option<String>,
}

impl Device {
    pub fn new(id: &str, name: &str, model: &str, capabilities: Capabilities) -> Self {
        Device {
            id: id.to_string(),
            name: name.to_string(),
            model: model.to_string(),
            capabilities,
            power_state: false,
            brightness: 0,
            color: Color::new(),
            color_temp: 0,
            online: true,
            source: Source::default(),
            error: None,
        }
    }

    pub fn power(&self) -> PowerMode {
        PowerMode::from(self.power_state)
    }

    pub fn hs_color(&self) -> HueSaturation {
        HueSaturation::from(&self.color)
    }

    /// `None` while the color temperature is unset.
    pub fn kelvin(&self) -> Option<Kelvin> {
        (self.color_temp != 0).then(|| Kelvin::clamped(i64::from(self.color_temp)))
    }

    pub(crate) fn apply_power(&mut self, power: PowerMode) {
        self.power_state = power.is_on();
        self.source = Source::History;
    }

    pub(crate) fn apply_brightness(&mut self, brightness: Brightness) {
        self.brightness = brightness.native();
        self.power_state = brightness.native() > 0;
        self.source = Source::History;
    }

    pub(crate) fn apply_color(&mut self, color: Color) {
        self.color = color;
        self.color_temp = 0;
        self.source = Source::History;
    }

    pub(crate) fn apply_color_temp(&mut self, kelvin: Kelvin) {
        self.color_temp = kelvin.kelvin();
        self.source = Source::History;
    }

    /// Record a failed refresh. Every other field keeps its last known value.
    pub(crate) fn mark_failed(&mut self, reason: &str) {
        self.error = Some(reason.to_string());
        self.online = false;
    }
}
