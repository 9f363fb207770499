//! RGB color representation.

use serde::{Deserialize, Serialize};

/// An RGB color with red, green, and blue components (0-255 each).
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    #[serde(rename = "r")]
    pub(crate) red: u8,
    #[serde(rename = "g")]
    pub(crate) green: u8,
    #[serde(rename = "b")]
    pub(crate) blue: u8,
}

impl Color {
    /// Create a color with the given RGB values.
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Create a default color (black: 0,0,0).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    pub fn as_tuple(&self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }
}
