//! PushTransport trait - Dispatcher delivery interface
//!
//! Defines the abstract interface for push endpoints.

use crate::{Message, Outcome};

/// Delivery trait
///
/// All provider transports (and test doubles) implement this trait.
#[trait_variant::make(PushTransport: Send)]
pub trait LocalPushTransport {
    /// Transport name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Deliver one message and classify the result
    ///
    /// Never retries. Expected failures are reported as [`Outcome`] variants.
    async fn send(&self, message: &Message) -> Outcome;
}
