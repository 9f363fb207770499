//! Brightness on the Govee native scale.

use serde::{Deserialize, Serialize};

use crate::convert::{brightness_to_native, brightness_to_platform};

/// Brightness level on the native scale, 0 to 254.
///
/// The platform scale (1 to 255) only appears at the entity boundary.
///
/// # Examples
///
/// ```
/// use govee_hass_rs::Brightness;
///
/// let brightness = Brightness::from_platform(255);
/// assert_eq!(brightness.native(), 254);
/// assert_eq!(brightness.platform(), 255);
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Brightness {
    pub(crate) value: u8,
}

impl Brightness {
    const MAX: u8 = 254;

    /// Values above the native maximum are capped.
    ///
    /// # Examples
    ///
    /// ```
    /// use govee_hass_rs::Brightness;
    ///
    /// assert_eq!(Brightness::from_native(0).platform(), 1);
    /// assert_eq!(Brightness::from_native(255).native(), 254);
    /// ```
    pub fn from_native(native: u8) -> Self {
        Brightness {
            value: native.min(Self::MAX),
        }
    }

    pub fn from_platform(platform: u8) -> Self {
        Brightness {
            value: brightness_to_native(platform),
        }
    }

    pub fn native(&self) -> u8 {
        self.value
    }

    pub fn platform(&self) -> u8 {
        brightness_to_platform(self.value)
    }
}
