//! smol runtime implementation.

use std::future::Future;
use std::time::Duration;

use super::{Spawner, TaskHandle};

/// smol task spawner.
pub struct SmolSpawner;

impl Spawner for SmolSpawner {
    type JoinHandle = SmolJoinHandle;

    fn spawn<F>(future: F) -> Self::JoinHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        SmolJoinHandle(smol::spawn(future))
    }
}

/// Wrapper around smol's Task. The task runs for as long as this is alive.
pub struct SmolJoinHandle(smol::Task<()>);

impl TaskHandle for SmolJoinHandle {
    fn abort(self) {
        // Dropping a smol Task cancels it.
        drop(self.0);
    }
}

/// Sleep for the specified duration using smol.
pub async fn sleep_impl(duration: Duration) {
    smol::Timer::after(duration).await;
}

/// Spawn a task using smol.
pub fn spawn<F>(future: F) -> SmolJoinHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    SmolSpawner::spawn(future)
}
