//! 投递上下文
//!
//! 封装"我正在处理哪个地点、第几页、第几个职位"这一信息，以及流程层共用的等待参数

use std::fmt::Display;
use std::time::Duration;

use crate::config::Config;

/// 投递上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyCtx {
    /// 地点名
    pub location: String,

    /// 地点序号（从1开始，仅用于日志显示）
    pub location_index: usize,

    /// 地点总数
    pub location_total: usize,

    /// 结果页码（从1开始，0 表示尚未进入结果页）
    pub page: usize,

    /// 职位在当前页中的序号（从1开始，0 表示尚未选中职位）
    pub card_index: usize,
}

impl ApplyCtx {
    /// 创建地点级别的上下文
    pub fn for_location(location: impl Into<String>, location_index: usize, location_total: usize) -> Self {
        Self {
            location: location.into(),
            location_index,
            location_total,
            page: 0,
            card_index: 0,
        }
    }

    /// 进入某一页
    pub fn on_page(&self, page: usize) -> Self {
        Self {
            page,
            card_index: 0,
            ..self.clone()
        }
    }

    /// 选中某个职位
    pub fn at_card(&self, card_index: usize) -> Self {
        Self {
            card_index,
            ..self.clone()
        }
    }
}

impl Display for ApplyCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[地点 {}/{} {}",
            self.location_index, self.location_total, self.location
        )?;
        if self.page > 0 {
            write!(f, " | 第 {} 页", self.page)?;
        }
        if self.card_index > 0 {
            write!(f, " | 职位 {}", self.card_index)?;
        }
        write!(f, "]")
    }
}

/// 流程层的等待与重试参数
#[derive(Debug, Clone)]
pub struct FlowSettings {
    pub search_url: String,
    pub short_wait: Duration,
    pub poll_interval: Duration,
    pub lookup_retries: usize,
    pub lookup_retry_delay: Duration,
    pub max_dialog_steps: usize,
    pub verbose_logging: bool,
}

impl FlowSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            search_url: config.search_url.clone(),
            short_wait: config.short_wait,
            poll_interval: config.poll_interval,
            lookup_retries: config.lookup_retries,
            lookup_retry_delay: config.lookup_retry_delay,
            max_dialog_steps: config.max_dialog_steps,
            verbose_logging: config.verbose_logging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctx_display() {
        let ctx = ApplyCtx::for_location("Switzerland", 1, 2);
        assert_eq!(ctx.to_string(), "[地点 1/2 Switzerland]");
        assert_eq!(
            ctx.on_page(3).at_card(4).to_string(),
            "[地点 1/2 Switzerland | 第 3 页 | 职位 4]"
        );
        assert_eq!(ctx.on_page(3).at_card(4).on_page(4).card_index, 0);
    }
}
