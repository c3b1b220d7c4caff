//! 配置校验模块
//!
//! 校验规则：
//! - min_interval_seconds 为有限值且 >= 0
//! - request_timeout_seconds > 0
//! - endpoint (若设置) 为 http/https 绝对 URL
//! - allowed_categories 不含空标签
//! - token 嵌入 URL 路径时不得包含 '/' 或空白

use contracts::{ContractError, PushConfig};
use std::time::Duration;
use url::Url;

/// 校验 PushConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &PushConfig) -> Result<(), ContractError> {
    validate_interval(config)?;
    validate_timeout(config)?;
    validate_endpoint(config)?;
    validate_categories(config)?;
    validate_token(config)?;
    Ok(())
}

/// 校验发送间隔
fn validate_interval(config: &PushConfig) -> Result<(), ContractError> {
    let secs = config.min_interval_seconds;
    if !secs.is_finite() || secs < 0.0 {
        return Err(ContractError::config_validation(
            "min_interval_seconds",
            format!("min_interval_seconds must be a finite value >= 0, got {secs}"),
        ));
    }
    if secs > Duration::MAX.as_secs_f64() {
        return Err(ContractError::config_validation(
            "min_interval_seconds",
            format!("min_interval_seconds {secs} exceeds the representable maximum"),
        ));
    }
    Ok(())
}

/// 校验请求超时
fn validate_timeout(config: &PushConfig) -> Result<(), ContractError> {
    if config.request_timeout_seconds == 0 {
        return Err(ContractError::config_validation(
            "request_timeout_seconds",
            "request_timeout_seconds must be > 0",
        ));
    }
    Ok(())
}

/// 校验 endpoint
fn validate_endpoint(config: &PushConfig) -> Result<(), ContractError> {
    let Some(endpoint) = config.endpoint.as_deref() else {
        return Ok(());
    };

    let url = Url::parse(endpoint).map_err(|e| {
        ContractError::config_validation("endpoint", format!("invalid URL '{endpoint}': {e}"))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ContractError::config_validation(
            "endpoint",
            format!("unsupported scheme '{}', expected http or https", url.scheme()),
        ));
    }

    if url.host_str().is_none() {
        return Err(ContractError::config_validation(
            "endpoint",
            format!("endpoint '{endpoint}' has no host"),
        ));
    }

    Ok(())
}

/// 校验消息类型白名单
fn validate_categories(config: &PushConfig) -> Result<(), ContractError> {
    for (idx, category) in config.allowed_categories.iter().enumerate() {
        if category.is_empty() {
            return Err(ContractError::config_validation(
                format!("allowed_categories[{idx}]"),
                "category tag cannot be empty",
            ));
        }
    }
    Ok(())
}

/// 校验 token
fn validate_token(config: &PushConfig) -> Result<(), ContractError> {
    if config.provider.embeds_token_in_path()
        && config
            .token
            .chars()
            .any(|c| c == '/' || c.is_whitespace())
    {
        return Err(ContractError::config_validation(
            "token",
            format!(
                "provider '{}' embeds the token in the URL path; it cannot contain '/' or whitespace",
                config.provider.name()
            ),
        ));
    }
    Ok(())
}
