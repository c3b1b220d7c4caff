//! Dispatch worker - drains the queue through rate limit, filter and transport

use std::sync::Arc;

use chrono::Utc;
use contracts::{Message, Outcome, PushConfig, PushTransport, WorkerState};
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::filter::{self, FilterDecision};
use crate::metrics::DispatchMetrics;
use crate::queue::MessageQueue;
use crate::rate_limiter::RateLimiter;

/// One worker generation
///
/// Sole consumer of the queue and sole owner of the rate limiter while it runs.
pub(crate) struct Worker<T> {
    pub(crate) generation: u64,
    pub(crate) transport: T,
    pub(crate) config: Arc<PushConfig>,
    pub(crate) queue: MessageQueue,
    pub(crate) limiter: RateLimiter,
    pub(crate) metrics: Arc<DispatchMetrics>,
    pub(crate) state: Arc<watch::Sender<WorkerState>>,
    pub(crate) shutdown: CancellationToken,
}

impl<T: PushTransport> Worker<T> {
    /// Run until shutdown is observed at the idle boundary
    ///
    /// Returns the last successful send time so the next generation keeps
    /// honouring the interval.
    #[instrument(
        name = "dispatch_worker_loop",
        skip(self),
        fields(generation = self.generation, provider = %self.transport.name())
    )]
    pub(crate) async fn run(mut self) -> Option<Instant> {
        info!(
            min_interval_ms = self.limiter.min_interval().as_millis() as u64,
            allowed_categories = self.config.allowed_categories.len(),
            "Dispatch worker started"
        );

        loop {
            self.set_state(WorkerState::Idle);

            let Some(message) = self.queue.dequeue(&self.shutdown).await else {
                break;
            };
            self.metrics.set_queue_len(self.queue.len());

            self.process(message).await;
        }

        self.set_state(WorkerState::Stopped);
        info!(pending = self.queue.len(), "Dispatch worker stopped");

        self.limiter.last_send()
    }

    /// One cycle: wait, filter, send, record
    ///
    /// The wait comes before the filter, so a skipped message still pays it.
    async fn process(&mut self, message: Message) {
        self.set_state(WorkerState::WaitingRateLimit);
        let waited = self.limiter.wait_if_needed().await;
        self.metrics.record_wait(waited);
        if !waited.is_zero() {
            let wait_ms = waited.as_secs_f64() * 1000.0;
            debug!(wait_ms, "Rate limit wait finished");
            observability::record_rate_limit_wait_ms(wait_ms);
        }

        let decision = filter::check(&self.config, &message);
        if let Some(reason) = decision.skip_reason() {
            self.skip(&message, decision);
            self.metrics.inc_skipped_count();
            observability::record_skipped(reason);
            return;
        }

        self.set_state(WorkerState::Sending);
        info!(title = %message.title, body = %message.body, "Sending message");

        let started = Instant::now();
        let outcome = self.transport.send(&message).await;
        let latency = started.elapsed();

        self.metrics.record_latency(latency);
        observability::record_send_latency_ms(
            self.transport.name(),
            latency.as_secs_f64() * 1000.0,
        );
        observability::record_outcome(self.transport.name(), &outcome);

        self.record_outcome(&message, &outcome);
    }

    fn skip(&self, message: &Message, decision: FilterDecision) {
        match decision {
            FilterDecision::SkipChannel => debug!(
                title = %message.title,
                channel = ?message.channel,
                "Message addressed to another channel, skipped"
            ),
            FilterDecision::SkipCategory => info!(
                title = %message.title,
                category = ?message.category,
                "Message category not enabled, skipped"
            ),
            FilterDecision::Forward => {}
        }
    }

    fn record_outcome(&mut self, message: &Message, outcome: &Outcome) {
        if outcome.is_success() {
            self.limiter.record_send(Instant::now());
            self.metrics.record_success(Utc::now());
            self.set_state(WorkerState::Success);
            info!(title = %message.title, "Message sent");
            return;
        }

        self.metrics.inc_failure_count();
        self.set_state(WorkerState::Failure);

        match outcome {
            Outcome::ProviderRejected { code, message: reason } => warn!(
                title = %message.title,
                code,
                reason = %reason,
                "Message rejected by provider"
            ),
            Outcome::BadRequest | Outcome::ServerError => warn!(
                title = %message.title,
                outcome = %outcome,
                "Message send failed"
            ),
            Outcome::TransportError { .. } | Outcome::UnknownFailure { .. } => error!(
                title = %message.title,
                outcome = %outcome,
                "Message send failed"
            ),
            Outcome::Success => {}
        }
    }

    fn set_state(&self, state: WorkerState) {
        self.state.send_replace(state);
    }
}
