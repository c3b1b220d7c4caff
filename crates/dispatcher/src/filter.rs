//! Admission checks applied by the worker after the rate-limit wait

use contracts::{Message, PushConfig};

/// Result of the per-message admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Hand the message to the transport
    Forward,
    /// Message names an explicit channel; some other deliverer owns it
    SkipChannel,
    /// Category set and not in a non-empty allow-list
    SkipCategory,
}

impl FilterDecision {
    /// Metric label for skips
    pub fn skip_reason(&self) -> Option<&'static str> {
        match self {
            Self::Forward => None,
            Self::SkipChannel => Some("channel"),
            Self::SkipCategory => Some("category"),
        }
    }
}

/// Decide whether a dequeued message is forwarded
pub fn check(config: &PushConfig, message: &Message) -> FilterDecision {
    if message.channel.is_some() {
        return FilterDecision::SkipChannel;
    }
    if !config.allows(message.category.as_ref()) {
        return FilterDecision::SkipCategory;
    }
    FilterDecision::Forward
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_allowing(categories: &[&str]) -> PushConfig {
        PushConfig {
            allowed_categories: categories.iter().map(|c| (*c).into()).collect(),
            ..PushConfig::with_token("T1")
        }
    }

    #[test]
    fn test_empty_allow_list_forwards_everything() {
        let config = config_allowing(&[]);
        let msg = Message::new("Hello", "World").with_category("manual");
        assert_eq!(check(&config, &msg), FilterDecision::Forward);
    }

    #[test]
    fn test_disallowed_category_is_skipped() {
        let config = config_allowing(&["download"]);
        let msg = Message::new("Hello", "World").with_category("manual");
        assert_eq!(check(&config, &msg), FilterDecision::SkipCategory);
        assert_eq!(
            FilterDecision::SkipCategory.skip_reason(),
            Some("category")
        );
    }

    #[test]
    fn test_untagged_message_always_passes() {
        let config = config_allowing(&["download"]);
        let msg = Message::new("Hello", "World");
        assert_eq!(check(&config, &msg), FilterDecision::Forward);
    }

    #[test]
    fn test_allowed_category_passes() {
        let config = config_allowing(&["download", "organize"]);
        let msg = Message::new("Done", "").with_category("Organize");
        assert_eq!(check(&config, &msg), FilterDecision::Forward);
    }

    #[test]
    fn test_channel_addressed_message_is_skipped() {
        let config = config_allowing(&[]);
        let msg = Message::new("Hello", "").with_channel("telegram");
        assert_eq!(check(&config, &msg), FilterDecision::SkipChannel);
    }
}
