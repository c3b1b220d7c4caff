//! 分发指标收集模块
//!
//! 通过 `metrics` facade 记录队列与发送结果指标；未安装 recorder 时为空操作。

use contracts::Outcome;
use metrics::{counter, gauge, histogram};

/// 记录消息入队
pub fn record_enqueued(queue_len: usize) {
    counter!("notify_dispatch_messages_enqueued_total").increment(1);
    gauge!("notify_dispatch_queue_len").set(queue_len as f64);
}

/// 记录入队被拒 (reason: "empty" / "inactive" / "closed")
pub fn record_rejected(reason: &'static str) {
    counter!("notify_dispatch_messages_rejected_total", "reason" => reason).increment(1);
}

/// 记录跳过 (reason: "category" / "channel")
pub fn record_skipped(reason: &'static str) {
    counter!("notify_dispatch_messages_skipped_total", "reason" => reason).increment(1);
}

/// 记录一次发送结果
///
/// # Example
///
/// ```ignore
/// let outcome = transport.send(&message).await;
/// observability::record_outcome(transport.name(), &outcome);
/// ```
pub fn record_outcome(provider: &str, outcome: &Outcome) {
    counter!(
        "notify_dispatch_outcomes_total",
        "provider" => provider.to_string(),
        "outcome" => outcome.label()
    )
    .increment(1);
}

/// 记录限流等待时长
pub fn record_rate_limit_wait_ms(wait_ms: f64) {
    histogram!("notify_dispatch_rate_limit_wait_ms").record(wait_ms);
}

/// 记录发送耗时
pub fn record_send_latency_ms(provider: &str, latency_ms: f64) {
    histogram!(
        "notify_dispatch_send_latency_ms",
        "provider" => provider.to_string()
    )
    .record(latency_ms);
}

/// 统计摘要
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// 最小值
    pub fn min(&self) -> f64 {
        self.min
    }

    /// 最大值
    pub fn max(&self) -> f64 {
        self.max
    }

    /// 摘要
    pub fn summary(&self) -> StatsSummary {
        StatsSummary::from(self)
    }
}
