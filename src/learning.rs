//! Persistent per-device quirks learned by the vendor client.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// What the vendor client found out about a device at runtime.
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct LearnedInfo {
    /// Largest brightness the device accepts on set (some models stop at 100).
    pub set_brightness_max: Option<u8>,
    /// Largest brightness the device reports on get.
    pub get_brightness_max: Option<u8>,
    /// Device ignores brightness while off and needs a turn-on first.
    #[serde(default)]
    pub before_set_brightness_turn_on: bool,
    /// Treat an offline report as "off" instead of "unavailable".
    pub config_offline_is_off: Option<bool>,
}

/// JSON file of [`LearnedInfo`] keyed by device id, kept in the host's
/// config directory so it survives restarts.
#[derive(Debug, Clone)]
pub struct LearningStorage {
    path: PathBuf,
}

impl LearningStorage {
    pub const FILE_NAME: &'static str = "govee_learning.json";

    pub fn new(config_dir: &Path) -> Self {
        LearningStorage {
            path: config_dir.join(Self::FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is not an error; nothing has been learned yet.
    pub fn read(&self) -> Result<HashMap<String, LearnedInfo>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No learning storage at {:?} yet", self.path);
                return Ok(HashMap::new());
            }
            Err(e) => return Err(Error::storage("read", &self.path, e)),
        };
        serde_json::from_str(&raw).map_err(Error::JsonLoad)
    }

    pub fn write(&self, learned: &HashMap<String, LearnedInfo>) -> Result<()> {
        let raw = serde_json::to_string_pretty(learned).map_err(Error::JsonDump)?;
        fs::write(&self.path, raw).map_err(|e| Error::storage("write", &self.path, e))?;
        debug!("Stored learned info for {} devices", learned.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LearningStorage::new(dir.path());
        assert!(storage.read().unwrap().is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LearningStorage::new(dir.path());

        let learned = HashMap::from([(
            "AA:BB".to_string(),
            LearnedInfo {
                set_brightness_max: Some(100),
                before_set_brightness_turn_on: true,
                ..Default::default()
            },
        )]);
        storage.write(&learned).unwrap();

        assert_eq!(storage.read().unwrap(), learned);
        assert_eq!(storage.path(), dir.path().join("govee_learning.json"));
    }

    #[test]
    fn test_corrupt_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LearningStorage::new(dir.path());
        fs::write(storage.path(), "not json").unwrap();
        assert!(matches!(storage.read(), Err(Error::JsonLoad(_))));
    }

    #[test]
    fn test_unwritable_dir_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LearningStorage::new(&dir.path().join("missing"));
        assert!(matches!(
            storage.write(&HashMap::new()),
            Err(Error::Storage { .. })
        ));
    }
}
