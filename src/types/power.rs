//! Power mode for light control.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Power state for a device.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PowerMode {
    /// Turn the device on
    On,
    /// Turn the device off
    Off,
}

impl PowerMode {
    pub fn is_on(self) -> bool {
        matches!(self, PowerMode::On)
    }
}

impl From<bool> for PowerMode {
    fn from(on: bool) -> Self {
        if on { PowerMode::On } else { PowerMode::Off }
    }
}
