//! Switch entities for on/off-only devices such as smart plugs.

use std::ops::Deref;

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::client::VendorClient;
use crate::entity::Entity;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SwitchDeviceClass {
    Outlet,
    Switch,
}

/// A Govee device that can only be switched on and off.
pub struct SwitchEntity<C> {
    entity: Entity<C>,
}

impl<C: VendorClient> SwitchEntity<C> {
    pub fn new(entity: Entity<C>) -> Self {
        SwitchEntity { entity }
    }

    pub fn entity(&self) -> &Entity<C> {
        &self.entity
    }

    pub fn device_class(&self) -> SwitchDeviceClass {
        SwitchDeviceClass::Outlet
    }
}

impl<C> Deref for SwitchEntity<C> {
    type Target = Entity<C>;

    fn deref(&self) -> &Entity<C> {
        &self.entity
    }
}
