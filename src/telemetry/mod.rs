//! 日志初始化
//!
//! 使用 `tracing-subscriber` 的 fmt 输出。宿主程序已经安装了全局
//! subscriber 时，初始化会被跳过。

use crate::config::LoggingConfig;
use std::str::FromStr;
use tracing::Level;

/// 解析日志级别，无法识别时退回 `info`
pub fn parse_level(level: &str) -> Level {
    Level::from_str(level.trim()).unwrap_or(Level::INFO)
}

/// 安装全局日志 subscriber
///
/// 返回本次调用是否完成了安装。
pub fn init_logging(config: &LoggingConfig) -> bool {
    let level = parse_level(&config.level);
    let installed = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(level = %level, "日志已初始化");
    }
    installed
}
