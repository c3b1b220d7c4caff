//! # Contracts
//!
//! Frozen interface contracts shared by the dispatcher crates.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Data flow
//! event source -> `Message` -> queue -> worker -> `PushTransport` -> `Outcome`

mod category;
mod config;
mod error;
mod message;
mod outcome;
mod state;
mod transport;

pub use category::Category;
pub use config::*;
pub use error::*;
pub use message::Message;
pub use outcome::Outcome;
pub use state::WorkerState;
pub use transport::{LocalPushTransport, PushTransport};
