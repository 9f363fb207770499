//! async-std runtime implementation.

use std::future::Future;
use std::time::Duration;

use super::{Spawner, TaskHandle};

/// async-std task spawner.
pub struct AsyncStdSpawner;

impl Spawner for AsyncStdSpawner {
    type JoinHandle = AsyncStdJoinHandle;

    fn spawn<F>(future: F) -> Self::JoinHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        AsyncStdJoinHandle(async_std::task::spawn(future))
    }
}

/// Wrapper around async-std's JoinHandle.
pub struct AsyncStdJoinHandle(async_std::task::JoinHandle<()>);

impl TaskHandle for AsyncStdJoinHandle {
    /// async-std only cancels from async context, so the task is detached
    /// here and exits on its own once it observes its stop flag.
    fn abort(self) {
        drop(self.0);
    }
}

/// Sleep for the specified duration using async-std.
pub async fn sleep_impl(duration: Duration) {
    async_std::task::sleep(duration).await
}

/// Spawn a task using async-std.
pub fn spawn<F>(future: F) -> AsyncStdJoinHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    AsyncStdSpawner::spawn(future)
}
