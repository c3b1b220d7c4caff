//! Dispatcher - lifecycle controller owning the queue and the worker generation

use std::sync::Arc;

use contracts::{Message, PushConfig, PushTransport, WorkerState};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::error::DispatcherError;
use crate::metrics::{DispatchMetrics, MetricsSnapshot};
use crate::queue::MessageQueue;
use crate::rate_limiter::RateLimiter;
use crate::worker::Worker;

/// Running worker generation
struct WorkerHandle {
    generation: u64,
    shutdown: CancellationToken,
    join: JoinHandle<Option<Instant>>,
}

/// Rate-limited notification dispatcher
///
/// Owns the config snapshot, the queue, and at most one worker generation.
/// Producers obtained through [`Dispatcher::producer`] may enqueue from any
/// task or thread.
pub struct Dispatcher {
    config_tx: watch::Sender<Arc<PushConfig>>,
    queue: MessageQueue,
    metrics: Arc<DispatchMetrics>,
    state_tx: Arc<watch::Sender<WorkerState>>,
    /// Carried between generations so a restart cannot shortcut the interval
    last_send: Option<Instant>,
    generation: u64,
    worker: Option<WorkerHandle>,
}

impl Dispatcher {
    /// Create a stopped dispatcher for a config snapshot
    pub fn new(config: PushConfig) -> Self {
        let (config_tx, _) = watch::channel(Arc::new(config));
        let (state_tx, _) = watch::channel(WorkerState::Stopped);

        Self {
            config_tx,
            queue: MessageQueue::new(),
            metrics: Arc::new(DispatchMetrics::new()),
            state_tx: Arc::new(state_tx),
            last_send: None,
            generation: 0,
            worker: None,
        }
    }

    /// Current config snapshot
    pub fn config(&self) -> Arc<PushConfig> {
        Arc::clone(&self.config_tx.borrow())
    }

    /// Enabled and carrying a token
    pub fn is_active(&self) -> bool {
        self.config_tx.borrow().is_active()
    }

    /// Cloneable enqueue handle
    pub fn producer(&self) -> Producer {
        Producer {
            config: self.config_tx.subscribe(),
            queue: self.queue.clone(),
            metrics: Arc::clone(&self.metrics),
        }
    }

    /// Validate and enqueue a message
    ///
    /// See [`Producer::enqueue`].
    pub fn enqueue(&self, message: Message) -> Result<(), DispatcherError> {
        admit(&self.config_tx.borrow(), &self.queue, &self.metrics, message)
    }

    /// Launch a worker generation if the config is active
    ///
    /// Returns `Ok(false)` without spawning when disabled or token-less.
    /// Must be called from within a tokio runtime.
    #[instrument(name = "dispatcher_start", skip(self, transport))]
    pub fn start<T>(&mut self, transport: T) -> Result<bool, DispatcherError>
    where
        T: PushTransport + 'static,
    {
        if let Some(worker) = &self.worker {
            if !worker.join.is_finished() {
                return Err(DispatcherError::AlreadyRunning {
                    generation: worker.generation,
                });
            }
        }

        let config = self.config();
        if !config.is_active() {
            info!(
                enabled = config.enabled,
                has_token = !config.token.is_empty(),
                "Dispatcher inactive, worker not started"
            );
            return Ok(false);
        }

        self.generation += 1;
        let shutdown = CancellationToken::new();

        let worker = Worker {
            generation: self.generation,
            limiter: RateLimiter::resume(config.min_interval(), self.last_send),
            config,
            transport,
            queue: self.queue.clone(),
            metrics: Arc::clone(&self.metrics),
            state: Arc::clone(&self.state_tx),
            shutdown: shutdown.clone(),
        };
        self.state_tx.send_replace(WorkerState::Idle);

        let join = tokio::spawn(worker.run());

        self.worker = Some(WorkerHandle {
            generation: self.generation,
            shutdown,
            join,
        });

        debug!(generation = self.generation, "Worker generation spawned");
        Ok(true)
    }

    /// Signal shutdown and wait for the worker to reach `Stopped`
    ///
    /// An in-progress wait or send finishes first; queued messages stay queued.
    #[instrument(name = "dispatcher_stop", skip(self))]
    pub async fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        worker.shutdown.cancel();
        match worker.join.await {
            Ok(last_send) => {
                if last_send.is_some() {
                    self.last_send = last_send;
                }
            }
            Err(e) => {
                error!(generation = worker.generation, error = ?e, "Worker task panicked");
            }
        }
        self.state_tx.send_replace(WorkerState::Stopped);

        debug!(generation = worker.generation, "Worker generation stopped");
    }

    /// Replace the config snapshot and restart the worker
    ///
    /// The old generation is fully stopped before the new one starts, so
    /// two workers never share the queue.
    #[instrument(name = "dispatcher_reconfigure", skip(self, config, transport))]
    pub async fn reconfigure<T>(
        &mut self,
        config: PushConfig,
        transport: T,
    ) -> Result<bool, DispatcherError>
    where
        T: PushTransport + 'static,
    {
        self.stop().await;
        self.config_tx.send_replace(Arc::new(config));
        info!("Dispatcher reconfigured");
        self.start(transport)
    }

    /// Stop the worker, close the queue and discard whatever is still pending
    ///
    /// Returns the number of discarded messages.
    #[instrument(name = "dispatcher_shutdown", skip(self))]
    pub async fn shutdown(mut self) -> usize {
        self.stop().await;
        self.queue.close();

        let discarded = self.queue.drain().len();
        self.metrics.set_queue_len(0);
        if discarded > 0 {
            warn!(discarded, "Dispatcher shut down with pending messages");
        } else {
            info!("Dispatcher shut down");
        }
        discarded
    }

    /// True while a worker generation is alive
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.join.is_finished())
    }

    /// Current worker state
    pub fn state(&self) -> WorkerState {
        *self.state_tx.borrow()
    }

    /// Watch worker state transitions
    pub fn subscribe_state(&self) -> watch::Receiver<WorkerState> {
        self.state_tx.subscribe()
    }

    /// Number of pending messages
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Shared metrics
    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    /// Metrics snapshot with the live queue length
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.metrics.set_queue_len(self.queue.len());
        self.metrics.snapshot()
    }
}

/// Cloneable enqueue handle for event sources
///
/// Always sees the dispatcher's current config snapshot.
#[derive(Clone)]
pub struct Producer {
    config: watch::Receiver<Arc<PushConfig>>,
    queue: MessageQueue,
    metrics: Arc<DispatchMetrics>,
}

impl Producer {
    /// Validate and enqueue a message
    ///
    /// Never blocks. Drops (with a warning) when the dispatcher is inactive
    /// or when both title and body are empty; the error only tells the
    /// caller why, nothing is retried.
    pub fn enqueue(&self, message: Message) -> Result<(), DispatcherError> {
        admit(&self.config.borrow(), &self.queue, &self.metrics, message)
    }
}

fn admit(
    config: &PushConfig,
    queue: &MessageQueue,
    metrics: &DispatchMetrics,
    message: Message,
) -> Result<(), DispatcherError> {
    let result = if !config.is_active() {
        Err(DispatcherError::Inactive)
    } else if !message.has_content() {
        Err(DispatcherError::EmptyMessage)
    } else {
        queue.enqueue(message)
    };

    match &result {
        Ok(()) => {
            let len = queue.len();
            metrics.inc_enqueued_count();
            metrics.set_queue_len(len);
            observability::record_enqueued(len);
            info!(pending = len, "Message queued");
        }
        Err(e) => {
            metrics.inc_rejected_count();
            observability::record_rejected(e.reason());
            warn!(reason = e.reason(), "{e}");
        }
    }

    result
}
