//! # govee_hass_rs
//!
//! An async Rust library that exposes Govee cloud-controlled lights and plugs
//! as home-automation entities.
//!
//! The HTTP client for the Govee API is not part of this crate. You plug one
//! in by implementing [`VendorClient`] and [`Connector`]; this crate keeps
//! the per-device state cache, dispatches commands, polls for fresh state and
//! projects everything into [`LightEntity`] and [`SwitchEntity`] values.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::path::Path;
//! use govee_hass_rs::{ConfigEntry, Integration, TurnOnRequest};
//!
//! async fn run(connector: MyConnector) -> Result<(), govee_hass_rs::Error> {
//!     let entry = ConfigEntry::new("Home", "my-api-key");
//!     let integration = Integration::setup_entry(&connector, entry, Path::new("/config")).await?;
//!
//!     for light in integration.lights() {
//!         let mut request = TurnOnRequest::new();
//!         request.brightness(128);
//!         light.turn_on(request).await;
//!     }
//!
//!     integration.unload().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Units
//!
//! Devices store brightness on Govee's native 0-254 scale and color
//! temperature in Kelvin. Entities report the platform's 1-255 brightness and
//! mireds. See [`convert`] for the conversions. Color temperatures sent to the
//! API are clamped to 2000K-9000K.
//!
//! ## Concurrency
//!
//! Commands and polls for the same device never overlap; each holds that
//! device's write lock for its whole API round trip. Different devices are
//! independent. Reading entity properties never waits on the network.
//!
//! ## Runtime Selection
//!
//! This library is runtime-agnostic. Select your preferred runtime using feature flags:
//!
//! ### Using tokio (default)
//!
//! ```toml
//! [dependencies]
//! govee-hass-rs = "0.1"
//! tokio = { version = "1", features = ["rt-multi-thread", "macros"] }
//! ```
//!
//! ### Using async-std
//!
//! ```toml
//! [dependencies]
//! govee-hass-rs = { version = "0.1", default-features = false, features = ["runtime-async-std"] }
//! async-std = { version = "1.12", features = ["attributes"] }
//! ```
//!
//! ### Using smol
//!
//! ```toml
//! [dependencies]
//! govee-hass-rs = { version = "0.1", default-features = false, features = ["runtime-smol"] }
//! smol = "2"
//! ```
//!
//! ## Feature Flags
//!
//! - `runtime-tokio` (default): Use the tokio async runtime
//! - `runtime-async-std`: Use the async-std runtime
//! - `runtime-smol`: Use the smol runtime

mod cache;
mod client;
mod config;
pub mod convert;
mod device;
mod dispatcher;
mod entity;
mod errors;
mod history;
mod integration;
mod learning;
mod light;
mod poller;
mod request;
pub mod runtime;
mod switch;
mod types;

// Re-export public API
pub use cache::{DeviceCache, DeviceWriter, ListenerId, StateCallback};
pub use client::{Connector, OnlineCallback, VendorClient};
pub use config::{ConfigEntry, EntityOptions, EntryData, EntryOptions};
pub use device::{Capabilities, Device, EntityKind, Source};
pub use dispatcher::Dispatcher;
pub use entity::{DeviceInfo, Entity};
pub use errors::Error;
pub use history::{CommandHistory, EventType, HistoryEntry, HistorySummary};
pub use integration::Integration;
pub use learning::{LearnedInfo, LearningStorage};
pub use light::{LightEntity, SupportedFeatures};
pub use poller::{PollHandle, Poller};
pub use request::{Attribute, TurnOnRequest};
pub use switch::{SwitchDeviceClass, SwitchEntity};
pub use types::{Brightness, Color, HueSaturation, Kelvin, PowerMode};
