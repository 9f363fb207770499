//! Turn-on requests as the platform sends them.

use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::types::HueSaturation;

/// Platform attribute names understood by [`TurnOnRequest::from_params`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, Display, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Attribute {
    HsColor,
    Brightness,
    ColorTemp,
}

impl Attribute {
    /// Every parameter name a turn-on request understands.
    pub fn names() -> Vec<&'static str> {
        Attribute::iter().map(<&'static str>::from).collect()
    }
}

/// A combined turn-on request in platform units.
///
/// Any subset of color, brightness and color temperature may be present. An
/// empty request means "just turn on".
///
/// # Creating Requests
///
/// 1. **From a single attribute** using the [`From`] trait:
///    ```
///    use govee_hass_rs::{HueSaturation, TurnOnRequest};
///    let request = TurnOnRequest::from(&HueSaturation::create(30.0, 100.0).unwrap());
///    assert!(!request.is_plain_turn_on());
///    ```
///
/// 2. **Builder pattern** for combining multiple attributes:
///    ```
///    use govee_hass_rs::TurnOnRequest;
///    let mut request = TurnOnRequest::new();
///    request.brightness(200);
///    request.color_temp(300);
///    ```
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TurnOnRequest {
    pub(crate) hs_color: Option<HueSaturation>,
    /// Platform scale, 1-255.
    pub(crate) brightness: Option<u8>,
    /// Mireds.
    pub(crate) color_temp: Option<u32>,
    #[serde(skip_serializing_if = "Map::is_empty", default)]
    pub(crate) unknown: Map<String, Value>,
}

impl TurnOnRequest {
    /// Create a new empty request.
    ///
    /// # Examples
    ///
    /// ```
    /// use govee_hass_rs::TurnOnRequest;
    ///
    /// assert!(TurnOnRequest::new().is_plain_turn_on());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw platform parameters.
    ///
    /// Unknown keys and values that do not fit their attribute are kept aside
    /// and otherwise ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use govee_hass_rs::TurnOnRequest;
    ///
    /// let params = json!({"brightness": 128, "transition": 2});
    /// let request = TurnOnRequest::from_params(params.as_object().unwrap().clone());
    /// assert_eq!(request.get_brightness(), Some(128));
    /// assert!(request.unknown().contains_key("transition"));
    /// ```
    pub fn from_params(params: Map<String, Value>) -> Self {
        let mut request = Self::new();
        for (key, value) in params {
            let accepted = match Attribute::from_str(&key) {
                Ok(Attribute::HsColor) => parse_hs(&value).map(|hs| request.hs_color(&hs)),
                Ok(Attribute::Brightness) => value
                    .as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .map(|b| request.brightness(b)),
                Ok(Attribute::ColorTemp) => value
                    .as_u64()
                    .and_then(|m| u32::try_from(m).ok())
                    .map(|m| request.color_temp(m)),
                Err(_) => None,
            };
            if accepted.is_none() {
                debug!(
                    "Unhandled turn on parameter {key}: {value}, expected one of {:?}",
                    Attribute::names()
                );
                request.unknown.insert(key, value);
            }
        }
        request
    }

    pub fn hs_color(&mut self, hs: &HueSaturation) {
        self.hs_color = Some(*hs);
    }

    /// Set brightness on the platform scale (1-255).
    pub fn brightness(&mut self, brightness: u8) {
        self.brightness = Some(brightness);
    }

    /// Set color temperature in mireds.
    pub fn color_temp(&mut self, mireds: u32) {
        self.color_temp = Some(mireds);
    }

    pub fn get_hs_color(&self) -> Option<HueSaturation> {
        self.hs_color
    }

    pub fn get_brightness(&self) -> Option<u8> {
        self.brightness
    }

    pub fn get_color_temp(&self) -> Option<u32> {
        self.color_temp
    }

    /// Parameters that were passed but not understood.
    pub fn unknown(&self) -> &Map<String, Value> {
        &self.unknown
    }

    /// True when no color, brightness or color temperature was requested.
    pub fn is_plain_turn_on(&self) -> bool {
        self.hs_color.is_none() && self.brightness.is_none() && self.color_temp.is_none()
    }

    /// JSON form for logs and history.
    pub(crate) fn to_params(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn parse_hs(value: &Value) -> Option<HueSaturation> {
    match value.as_array()?.as_slice() {
        [hue, saturation] => HueSaturation::create(hue.as_f64()?, saturation.as_f64()?),
        _ => None,
    }
}

impl From<&HueSaturation> for TurnOnRequest {
    fn from(hs: &HueSaturation) -> Self {
        let mut r = TurnOnRequest::new();
        r.hs_color(hs);
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_from_params_known_attributes() {
        let request = TurnOnRequest::from_params(params(json!({
            "hs_color": [120.0, 50.0],
            "brightness": 255,
            "color_temp": 300,
        })));

        assert_eq!(
            request.get_hs_color(),
            HueSaturation::create(120.0, 50.0)
        );
        assert_eq!(request.get_brightness(), Some(255));
        assert_eq!(request.get_color_temp(), Some(300));
        assert!(request.unknown().is_empty());
    }

    #[test]
    fn test_bad_values_are_kept_aside() {
        let request = TurnOnRequest::from_params(params(json!({
            "brightness": 999,
            "hs_color": [1.0],
            "effect": "rainbow",
        })));

        assert!(request.is_plain_turn_on());
        assert_eq!(request.unknown().len(), 3);
    }

    #[test]
    fn test_to_params_omits_unset() {
        let mut request = TurnOnRequest::new();
        request.brightness(10);
        assert_eq!(request.to_params(), json!({"brightness": 10}));
    }

    #[test]
    fn test_attribute_names() {
        assert_eq!(Attribute::HsColor.as_ref(), "hs_color");
        assert_eq!(Attribute::from_str("color_temp").unwrap(), Attribute::ColorTemp);
        assert_eq!(Attribute::names(), ["hs_color", "brightness", "color_temp"]);
    }
}
