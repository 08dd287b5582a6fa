//! Cancellable delayed delivery of a message.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

/// A message that will be sent after a delay unless cancelled first.
///
/// Dropping the handle cancels the task as well.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Spawns a task that sends `message` on `tx` once `delay` has elapsed.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip(tx, message))]
    pub fn schedule<M>(delay: Duration, tx: UnboundedSender<M>, message: M) -> Self
    where
        M: Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(message).is_err() {
                debug!("Receiver dropped before scheduled message fired");
            }
        });
        Self { handle }
    }

    /// Stops the task; the message is never sent if it has not been already.
    pub fn cancel(self) {
        self.handle.abort();
    }

    /// Whether the task has run to completion or been aborted.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = ScheduledTask::schedule(Duration::from_millis(500), tx, 7u8);

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.recv().await, Some(7));
        assert!(task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_message() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = ScheduledTask::schedule(Duration::from_millis(500), tx, 7u8);

        tokio::time::sleep(Duration::from_millis(100)).await;
        task.cancel();

        // The aborted task drops its sender, so the channel closes empty.
        assert_eq!(rx.recv().await, None);
    }
}
