//! Color temperature control.

use serde::{Deserialize, Serialize};

use crate::convert::{
    COLOR_TEMP_KELVIN_MAX, clamp_kelvin, kelvin_to_mireds, mireds_to_kelvin,
};

/// Color temperature in Kelvin, always within the range the Govee API accepts.
///
/// Lower values produce warmer light, higher values cooler light. Values out
/// of range are clamped to the nearest bound rather than rejected.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Kelvin {
    pub(crate) kelvin: u32,
}

impl Kelvin {
    /// Create a Kelvin, clamping into the supported range.
    ///
    /// # Examples
    ///
    /// ```
    /// use govee_hass_rs::Kelvin;
    ///
    /// assert_eq!(Kelvin::clamped(1000).kelvin(), 2000);
    /// assert_eq!(Kelvin::clamped(4000).kelvin(), 4000);
    /// assert_eq!(Kelvin::clamped(12000).kelvin(), 9000);
    /// ```
    pub fn clamped(kelvin: i64) -> Self {
        Kelvin {
            kelvin: clamp_kelvin(kelvin),
        }
    }

    /// Convert a platform mired value. Zero mireds is infinitely cold and
    /// lands on the coldest bound.
    ///
    /// # Examples
    ///
    /// ```
    /// use govee_hass_rs::Kelvin;
    ///
    /// assert_eq!(Kelvin::from_mireds(300).kelvin(), 3333);
    /// assert_eq!(Kelvin::from_mireds(0).kelvin(), 9000);
    /// assert_eq!(Kelvin::from_mireds(1000).kelvin(), 2000);
    /// ```
    pub fn from_mireds(mireds: u32) -> Self {
        mireds_to_kelvin(mireds).map_or(
            Kelvin {
                kelvin: COLOR_TEMP_KELVIN_MAX,
            },
            |k| Self::clamped(i64::from(k)),
        )
    }

    /// Get the kelvin value.
    pub fn kelvin(&self) -> u32 {
        self.kelvin
    }

    /// The same temperature in mireds.
    ///
    /// # Examples
    ///
    /// ```
    /// use govee_hass_rs::Kelvin;
    ///
    /// assert_eq!(Kelvin::clamped(4000).mireds(), 250);
    /// assert_eq!(Kelvin::clamped(9000).mireds(), 111);
    /// ```
    pub fn mireds(&self) -> u32 {
        // Never zero, so the reciprocal always exists.
        kelvin_to_mireds(self.kelvin).unwrap_or_default()
    }
}
