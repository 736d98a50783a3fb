// Path: crates/ledger-client-core/src/task.rs
//! Thin wrappers over `tokio::spawn` and `tokio::sync` primitives, matching
//! the kernel's house style of not calling the runtime directly from
//! business logic: the Topic Subscription's background task and
//! the Mirror client's reconnect loop both go through here.

use std::future::Future;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

/// Spawns `future` on the current runtime, returning its join handle. A
/// one-line wrapper exists so call sites read as intent ("background task")
/// rather than a bare runtime call, and so a single point exists to add
/// instrumentation later.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::spawn(future)
}

/// An unbounded channel pair for delivering streamed items (topic messages,
/// mirror records) from a background task to the caller.
pub fn channel<T>(capacity: usize) -> (mpsc::Sender<T>, mpsc::Receiver<T>) {
    mpsc::channel(capacity)
}

/// Re-exported so callers needing an async-aware mutex (held across an
/// `.await`, unlike the node pool's `std::sync::Mutex`) don't need a direct
/// `tokio::sync` dependency.
pub type AsyncMutex<T> = Mutex<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spawned_future_runs_and_is_joinable() {
        let handle = spawn(async { 2 + 2 });
        assert_eq!(handle.await.unwrap(), 4);
    }

    #[tokio::test]
    async fn channel_delivers_in_order() {
        let (tx, mut rx) = channel::<u32>(4);
        tx.send(1).await.unwrap();
        tx.send(2).await.unwrap();
        drop(tx);
        assert_eq!(rx.recv().await, Some(1));
        assert_eq!(rx.recv().await, Some(2));
        assert_eq!(rx.recv().await, None);
    }
}
