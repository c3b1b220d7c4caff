//! MessageQueue - unbounded FIFO handoff between producers and the worker

use async_channel::{unbounded, Receiver, Sender, TrySendError};
use contracts::Message;
use tokio_util::sync::CancellationToken;

use crate::error::DispatcherError;

/// Unbounded FIFO queue
///
/// `enqueue` never blocks and is safe from any number of producers.
/// `dequeue` is only ever awaited by the single dispatch worker.
#[derive(Clone)]
pub struct MessageQueue {
    tx: Sender<Message>,
    rx: Receiver<Message>,
}

impl MessageQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Push a message to the back of the queue
    ///
    /// Only fails once the queue has been closed.
    pub fn enqueue(&self, message: Message) -> Result<(), DispatcherError> {
        match self.tx.try_send(message) {
            Ok(()) => Ok(()),
            // unbounded: Full is unreachable, treat both as closed
            Err(TrySendError::Closed(_)) | Err(TrySendError::Full(_)) => {
                Err(DispatcherError::QueueClosed)
            }
        }
    }

    /// Wait for the next message
    ///
    /// Returns `None` when `shutdown` fires first or the queue is closed and
    /// empty. Shutdown wins when both are ready.
    pub async fn dequeue(&self, shutdown: &CancellationToken) -> Option<Message> {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => None,
            next = self.rx.recv() => next.ok(),
        }
    }

    /// Pop without waiting
    pub fn try_dequeue(&self) -> Option<Message> {
        self.rx.try_recv().ok()
    }

    /// Number of pending messages
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// True if nothing is pending
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Close the queue; further enqueues fail, pending messages stay readable
    pub fn close(&self) -> bool {
        self.tx.close()
    }

    /// Remove and return every pending message
    pub fn drain(&self) -> Vec<Message> {
        std::iter::from_fn(|| self.try_dequeue()).collect()
    }
}

impl Default for MessageQueue {
    fn default() -> Self {
        Self::new()
    }
}
