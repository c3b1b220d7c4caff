//! # Dispatcher
//!
//! 限流通知分发模块。
//!
//! 负责：
//! - 接收生产者提交的 `Message` (FIFO 队列，永不阻塞)
//! - 单一 worker 顺序消费：限流等待 → 分类过滤 → HTTP 推送
//! - 两次成功推送之间保持最小间隔
//! - 启停与重新配置 (取消令牌，在空闲边界退出)

pub mod dispatcher;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod queue;
pub mod rate_limiter;
pub mod transports;
mod worker;

#[cfg(test)]
mod testing;

pub use contracts::{Category, Message, Outcome, Provider, PushConfig, PushTransport, WorkerState};
pub use dispatcher::{Dispatcher, Producer};
pub use error::DispatcherError;
pub use filter::FilterDecision;
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use queue::MessageQueue;
pub use rate_limiter::RateLimiter;
pub use transports::{
    classify, schema_for, HttpTransport, MeowSchema, RequestSchema, SuccessIndicator,
    TokenBodySchema,
};
