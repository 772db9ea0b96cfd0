//! Drive a library task while handling its progress events.
//!
//! Library operations report progress through an mpsc channel; the CLI
//! turns those events into spinner updates. [`run_with_events`] polls the
//! task and the channel together, then drains whatever events are left.

use std::future::Future;

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

/// Upper bound on draining leftover events after the task has finished.
/// A sender kept alive elsewhere would otherwise keep the drain waiting.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Run `task` to completion, calling `on_event` for every event it emits.
pub async fn run_with_events<F, E, R>(
    task: F,
    mut event_rx: mpsc::UnboundedReceiver<E>,
    mut on_event: impl FnMut(E),
) -> R
where
    F: Future<Output = R>,
{
    tokio::pin!(task);

    let result = loop {
        tokio::select! {
            r = &mut task => break Some(r),
            event = event_rx.recv() => match event {
                Some(e) => on_event(e),
                None => break None,
            },
        }
    };

    // Senders all dropped before the task finished: nothing left to drain
    let Some(result) = result else {
        return task.await;
    };

    let deadline = Instant::now() + DRAIN_TIMEOUT;
    loop {
        match tokio::time::timeout_at(deadline, event_rx.recv()).await {
            Ok(Some(e)) => on_event(e),
            Ok(None) => break,
            Err(_) => {
                log::warn!(
                    "Event drain timed out after {}s; some progress events were dropped",
                    DRAIN_TIMEOUT.as_secs()
                );
                break;
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_sent_before_completion_are_all_seen() {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = async move {
            for i in 0..5 {
                tx.send(i).unwrap();
                tokio::task::yield_now().await;
            }
            "done"
        };

        let mut seen = Vec::new();
        let result = run_with_events(task, rx, |e| seen.push(e)).await;

        assert_eq!(result, "done");
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn closed_channel_still_awaits_task() {
        let (tx, rx) = mpsc::unbounded_channel::<u8>();
        drop(tx);
        let result = run_with_events(async { 42 }, rx, |_| {}).await;
        assert_eq!(result, 42);
    }
}
