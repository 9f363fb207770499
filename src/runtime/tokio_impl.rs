//! Tokio runtime implementation.

use std::future::Future;
use std::time::Duration;

use super::{Spawner, TaskHandle};

/// Tokio task spawner.
pub struct TokioSpawner;

impl Spawner for TokioSpawner {
    type JoinHandle = TokioJoinHandle;

    fn spawn<F>(future: F) -> Self::JoinHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        TokioJoinHandle(tokio::spawn(future))
    }
}

/// Wrapper around tokio's JoinHandle.
pub struct TokioJoinHandle(tokio::task::JoinHandle<()>);

impl TaskHandle for TokioJoinHandle {
    fn abort(self) {
        self.0.abort();
    }
}

/// Sleep for the specified duration using tokio.
pub async fn sleep_impl(duration: Duration) {
    tokio::time::sleep(duration).await
}

/// Spawn a task using tokio.
pub fn spawn<F>(future: F) -> TokioJoinHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    TokioSpawner::spawn(future)
}
