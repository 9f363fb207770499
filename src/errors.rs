use std::path::{Path, PathBuf};

/// All error types that can occur while syncing Govee devices.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The vendor API rejected or failed a request.
    #[error("govee api error: {0}")]
    Api(String),

    /// Setup could not complete; the host should retry later.
    #[error("integration not ready: {0}")]
    NotReady(String),

    /// A state refresh for a single device failed.
    #[error("update failed for {device}: {reason}")]
    UpdateFailed { device: String, reason: String },

    /// The device id is not part of the current connection.
    #[error("device not found {0}")]
    DeviceNotFound(String),

    /// Reading or writing the learning store failed.
    #[error("learning storage {action} error at {path:?}: {err:?}")]
    Storage {
        action: String,
        path: PathBuf,
        err: std::io::Error,
    },

    /// Failed to serialize data to JSON.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// Failed to deserialize JSON data.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),
}

impl Error {
    /// Create a new vendor API error
    pub fn api(msg: impl Into<String>) -> Self {
        Error::Api(msg.into())
    }

    /// Create a new update failed error
    pub fn update_failed(device: &str, reason: &Error) -> Self {
        Error::UpdateFailed {
            device: device.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a new learning storage error
    pub fn storage(action: &str, path: &Path, err: std::io::Error) -> Self {
        Error::Storage {
            action: action.to_string(),
            path: path.to_path_buf(),
            err,
        }
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
