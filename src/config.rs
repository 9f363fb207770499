//! Config entry as stored by the host platform.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::Error;

/// Default seconds between state refreshes.
pub const DEFAULT_DELAY: u64 = 10;
/// Report history-sourced state as assumed unless told otherwise.
pub const DEFAULT_USE_ASSUMED_STATE: bool = true;

/// Values captured when the entry was created.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct EntryData {
    pub api_key: String,
    #[serde(default)]
    pub delay: Option<u64>,
}

/// Values the user may change later. Each one overrides [`EntryData`].
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct EntryOptions {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub delay: Option<u64>,
    #[serde(default)]
    pub use_assumed_state: Option<bool>,
}

/// One configured Govee account.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConfigEntry {
    #[serde(default = "Uuid::new_v4")]
    pub entry_id: Uuid,
    pub title: String,
    pub data: EntryData,
    #[serde(default)]
    pub options: EntryOptions,
}

impl ConfigEntry {
    pub fn new(title: &str, api_key: &str) -> Self {
        ConfigEntry {
            entry_id: Uuid::new_v4(),
            title: title.to_string(),
            data: EntryData {
                api_key: api_key.to_string(),
                delay: None,
            },
            options: EntryOptions::default(),
        }
    }

    /// Parse an entry from the host's JSON store.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use govee_hass_rs::ConfigEntry;
    ///
    /// let entry = ConfigEntry::from_json(r#"{
    ///     "title": "Home",
    ///     "data": {"api_key": "abc", "delay": 30},
    ///     "options": {"use_assumed_state": false}
    /// }"#).unwrap();
    ///
    /// assert_eq!(entry.api_key(), "abc");
    /// assert_eq!(entry.entity_options().poll_interval, Duration::from_secs(30));
    /// assert!(!entry.entity_options().use_assumed_state);
    /// ```
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        serde_json::from_str(raw).map_err(Error::JsonLoad)
    }

    pub fn api_key(&self) -> &str {
        self.options
            .api_key
            .as_deref()
            .unwrap_or(&self.data.api_key)
    }

    pub fn entity_options(&self) -> EntityOptions {
        let delay = self
            .options
            .delay
            .or(self.data.delay)
            .unwrap_or(DEFAULT_DELAY);
        EntityOptions {
            poll_interval: Duration::from_secs(delay),
            use_assumed_state: self
                .options
                .use_assumed_state
                .unwrap_or(DEFAULT_USE_ASSUMED_STATE),
        }
    }
}

/// Per-entity settings resolved from a [`ConfigEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityOptions {
    pub poll_interval: Duration,
    pub use_assumed_state: bool,
}

impl Default for EntityOptions {
    fn default() -> Self {
        EntityOptions {
            poll_interval: Duration::from_secs(DEFAULT_DELAY),
            use_assumed_state: DEFAULT_USE_ASSUMED_STATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let entry = ConfigEntry::new("Home", "key");
        assert_eq!(entry.entity_options(), EntityOptions::default());
        assert_eq!(entry.entity_options().poll_interval, Duration::from_secs(10));
        assert!(entry.entity_options().use_assumed_state);
    }

    #[test]
    fn test_options_override_data() {
        let mut entry = ConfigEntry::new("Home", "old");
        entry.data.delay = Some(20);
        entry.options.api_key = Some("new".into());
        entry.options.delay = Some(5);

        assert_eq!(entry.api_key(), "new");
        assert_eq!(entry.entity_options().poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_data_delay_without_option() {
        let mut entry = ConfigEntry::new("Home", "key");
        entry.data.delay = Some(20);
        assert_eq!(entry.entity_options().poll_interval, Duration::from_secs(20));
    }

    #[test]
    fn test_from_json_missing_options() {
        let entry = ConfigEntry::from_json(r#"{"title": "x", "data": {"api_key": "k"}}"#).unwrap();
        assert_eq!(entry.options, EntryOptions::default());
        assert!(ConfigEntry::from_json("{}").is_err());
    }
}
