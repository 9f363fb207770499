//! Runtime-agnostic async abstractions.
//!
//! Polling timers and the per-device write lock are the only things this
//! crate needs from an executor; this module provides them for whichever
//! runtime is selected.
//!
//! # Feature Flags
//!
//! Enable one of the following features to select your runtime:
//!
//! - `runtime-tokio` (default) - Use the tokio runtime
//! - `runtime-async-std` - Use the async-std runtime
//! - `runtime-smol` - Use the smol runtime
//!
//! # Example
//!
//! ```toml
//! [dependencies]
//! # Using async-std
//! govee-hass-rs = { version = "0.1", default-features = false, features = ["runtime-async-std"] }
//!
//! # Using smol
//! govee-hass-rs = { version = "0.1", default-features = false, features = ["runtime-smol"] }
//! ```

use std::future::Future;
use std::time::Duration;

#[cfg(feature = "runtime-tokio")]
mod tokio_impl;

#[cfg(feature = "runtime-async-std")]
mod async_std_impl;

#[cfg(feature = "runtime-smol")]
mod smol_impl;

// Re-export the active runtime's types
#[cfg(feature = "runtime-tokio")]
pub use tokio_impl::*;

#[cfg(feature = "runtime-async-std")]
pub use async_std_impl::*;

#[cfg(feature = "runtime-smol")]
pub use smol_impl::*;

/// Trait for async task spawning.
///
/// This trait abstracts over different async runtime's task spawning mechanisms.
/// Spawned tasks run detached; the returned handle only exists to stop them.
pub trait Spawner {
    /// A handle to a spawned task.
    type JoinHandle: TaskHandle;

    /// Spawn a future as a background task.
    fn spawn<F>(future: F) -> Self::JoinHandle
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Handle to a background task.
pub trait TaskHandle: Send {
    /// Stop the task at its next suspension point, where the runtime allows it.
    fn abort(self);
}

/// Sleep for the specified duration.
pub async fn sleep(duration: Duration) {
    sleep_impl(duration).await
}

// Async mutex re-export
#[cfg(feature = "runtime-tokio")]
pub use tokio::sync::{Mutex, MutexGuard};

#[cfg(feature = "runtime-async-std")]
pub use async_std::sync::{Mutex, MutexGuard};

#[cfg(feature = "runtime-smol")]
pub use async_lock::{Mutex, MutexGuard};

// JoinHandle type alias for task spawning
#[cfg(feature = "runtime-tokio")]
pub type JoinHandle = tokio_impl::TokioJoinHandle;

#[cfg(feature = "runtime-async-std")]
pub type JoinHandle = async_std_impl::AsyncStdJoinHandle;

#[cfg(feature = "runtime-smol")]
pub type JoinHandle = smol_impl::SmolJoinHandle;

// Compile-time check to ensure exactly one runtime is selected
#[cfg(not(any(
    feature = "runtime-tokio",
    feature = "runtime-async-std",
    feature = "runtime-smol"
)))]
compile_error!(
    "One of \"runtime-tokio\", \"runtime-async-std\", or \"runtime-smol\" features must be enabled"
);

#[cfg(all(feature = "runtime-tokio", feature = "runtime-async-std"))]
compile_error!("Features \"runtime-tokio\" and \"runtime-async-std\" are mutually exclusive");

#[cfg(all(feature = "runtime-tokio", feature = "runtime-smol"))]
compile_error!("Features \"runtime-tokio\" and \"runtime-smol\" are mutually exclusive");

#[cfg(all(feature = "runtime-async-std", feature = "runtime-smol"))]
compile_error!("Features \"runtime-async-std\" and \"runtime-smol\" are mutually exclusive");
