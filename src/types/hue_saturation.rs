//! Hue and Saturation color representation.

use serde::{Deserialize, Serialize};

use super::Color;
use crate::convert::{hs_to_rgb, rgb_to_hs};

/// Hue and Saturation color representation, as used by the platform.
///
/// - Hue: The color angle on the color wheel (0-360 degrees)
/// - Saturation: The intensity of the color (0-100 percent)
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct HueSaturation {
    hue: f64,
    saturation: f64,
}

impl HueSaturation {
    /// Create a new HueSaturation with the given values.
    ///
    /// Returns `None` if values are outside valid ranges.
    ///
    /// # Examples
    ///
    /// ```
    /// use govee_hass_rs::HueSaturation;
    ///
    /// assert!(HueSaturation::create(0.0, 100.0).is_some());
    /// assert!(HueSaturation::create(120.5, 50.0).is_some());
    /// assert!(HueSaturation::create(361.0, 50.0).is_none());
    /// assert!(HueSaturation::create(180.0, 101.0).is_none());
    /// assert!(HueSaturation::create(f64::NAN, 10.0).is_none());
    /// ```
    pub fn create(hue: f64, saturation: f64) -> Option<Self> {
        if (0.0..=360.0).contains(&hue) && (0.0..=100.0).contains(&saturation) {
            Some(HueSaturation { hue, saturation })
        } else {
            None
        }
    }

    /// Get the hue value.
    pub fn hue(&self) -> f64 {
        self.hue
    }

    /// Get the saturation value.
    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    /// Convert to RGB Color at full value.
    ///
    /// # Examples
    ///
    /// ```
    /// use govee_hass_rs::HueSaturation;
    ///
    /// let hs = HueSaturation::create(0.0, 100.0).unwrap();
    /// let color = hs.to_color();
    /// assert_eq!(color.red(), 255);
    /// assert_eq!(color.green(), 0);
    /// assert_eq!(color.blue(), 0);
    /// ```
    pub fn to_color(&self) -> Color {
        let (r, g, b) = hs_to_rgb(self.hue, self.saturation);
        Color::rgb(r, g, b)
    }
}

impl From<&HueSaturation> for Color {
    fn from(hs: &HueSaturation) -> Self {
        hs.to_color()
    }
}

impl From<&Color> for HueSaturation {
    fn from(color: &Color) -> Self {
        let (hue, saturation) = rgb_to_hs(color.red(), color.green(), color.blue());
        HueSaturation { hue, saturation }
    }
}
