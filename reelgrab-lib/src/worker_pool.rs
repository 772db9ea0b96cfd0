//! Fixed-size worker pool with a single result consumer.
//!
//! N tokio tasks pull work from a bounded `async-channel` and push results
//! into an unbounded mpsc channel. The caller is the only reader of that
//! channel, so anything it accumulates from the results needs no locking.
//! `async-channel`'s `Receiver` is `Clone`, which lets every worker hold its
//! own handle instead of sharing one behind a mutex.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A pool of worker tasks processing a fixed batch of items.
///
/// Results arrive in completion order, not submission order. Every item
/// yields exactly one result unless its task panics.
///
/// ```ignore
/// let mut pool = WorkerPool::start(10, entries, |entry| async move {
///     process(entry).await
/// });
/// while let Some(outcome) = pool.recv().await {
///     log.add(outcome);
/// }
/// ```
pub struct WorkerPool<R: Send + 'static> {
    result_rx: mpsc::UnboundedReceiver<R>,
    handles: Vec<JoinHandle<()>>,
}

impl<R: Send + 'static> WorkerPool<R> {
    /// Spawn up to `n` workers (at least one) and queue every item.
    ///
    /// No more workers are spawned than there are items. Submission runs in
    /// its own task, so the caller can start receiving right away.
    pub fn start<W, F, Fut>(n: usize, items: Vec<W>, process_fn: F) -> Self
    where
        W: Send + 'static,
        F: Fn(W) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let workers = n.max(1).min(items.len().max(1));
        let (work_tx, work_rx) = async_channel::bounded::<W>(workers);
        let (result_tx, result_rx) = mpsc::unbounded_channel::<R>();
        let process_fn = Arc::new(process_fn);

        log::debug!(
            "Worker pool: {} workers for {} items",
            workers,
            items.len()
        );

        let handles = (0..workers)
            .map(|_| {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let process_fn = process_fn.clone();
                tokio::spawn(async move {
                    while let Ok(item) = work_rx.recv().await {
                        if result_tx.send(process_fn(item).await).is_err() {
                            break;
                        }
                    }
                })
            })
            .collect();

        // Channel closes once the last worker exits
        drop(result_tx);

        tokio::spawn(async move {
            for item in items {
                if work_tx.send(item).await.is_err() {
                    break;
                }
            }
        });

        Self { result_rx, handles }
    }

    /// Next finished result, or `None` once every worker has exited.
    pub async fn recv(&mut self) -> Option<R> {
        self.result_rx.recv().await
    }

    /// Wait for every result and return them in completion order.
    pub async fn collect(mut self) -> Vec<R> {
        let mut results = Vec::new();
        while let Some(r) = self.recv().await {
            results.push(r);
        }
        results
    }

    /// Number of worker tasks spawned.
    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }
}
