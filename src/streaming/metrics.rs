//! 流式传输指标
//!
//! 记录单次流式交换中的字节、记录和事件计数，在流结束时写入日志。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// 单个流的指标
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamMetrics {
    /// 首字节时间（毫秒）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttfb_ms: Option<u64>,

    /// 读取到的 chunk 数量
    pub chunk_count: u32,

    /// 读取到的总字节数
    pub total_bytes: usize,

    /// 成功投递给处理器的事件数量
    pub event_count: u32,

    /// 解析失败并被跳过的记录数量
    pub parse_error_count: u32,

    /// 没有 `data: ` 前缀而被忽略的行数
    pub ignored_line_count: u32,

    /// 是否因 `final_response` 提前结束读取
    pub stopped_on_final: bool,

    pub start_time: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_chunk_time: Option<DateTime<Utc>>,
}

impl Default for StreamMetrics {
    fn default() -> Self {
        Self {
            ttfb_ms: None,
            chunk_count: 0,
            total_bytes: 0,
            event_count: 0,
            parse_error_count: 0,
            ignored_line_count: 0,
            stopped_on_final: false,
            start_time: Utc::now(),
            end_time: None,
            first_chunk_time: None,
        }
    }
}

impl StreamMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录收到一个 chunk
    ///
    /// 第一个 chunk 同时记录 TTFB。
    pub fn record_chunk(&mut self, bytes: usize) {
        self.chunk_count += 1;
        self.total_bytes += bytes;

        if self.first_chunk_time.is_none() {
            let now = Utc::now();
            self.first_chunk_time = Some(now);
            self.ttfb_ms = Some((now - self.start_time).num_milliseconds().max(0) as u64);
        }
    }

    pub fn record_event(&mut self) {
        self.event_count += 1;
    }

    pub fn record_parse_error(&mut self) {
        self.parse_error_count += 1;
    }

    pub fn record_ignored_line(&mut self) {
        self.ignored_line_count += 1;
    }

    /// 记录结束时间
    pub fn finish(&mut self) {
        self.end_time = Some(Utc::now());
    }

    /// 获取总耗时（毫秒）
    ///
    /// 未结束时返回从开始到现在的时间。
    pub fn duration_ms(&self) -> u64 {
        let end = self.end_time.unwrap_or_else(Utc::now);
        (end - self.start_time).num_milliseconds().max(0) as u64
    }

    /// 解析错误率：解析错误 / (成功事件 + 解析错误)
    pub fn error_rate(&self) -> f64 {
        let total = self.event_count + self.parse_error_count;
        if total == 0 {
            return 0.0;
        }
        self.parse_error_count as f64 / total as f64
    }

    /// 记录详细指标到日志
    pub fn log_metrics(&self, chat_id: Option<&str>) {
        info!(
            chat_id = ?chat_id,
            chunk_count = self.chunk_count,
            total_bytes = self.total_bytes,
            event_count = self.event_count,
            duration_ms = self.duration_ms(),
            ttfb_ms = ?self.ttfb_ms,
            parse_error_count = self.parse_error_count,
            ignored_line_count = self.ignored_line_count,
            error_rate = format!("{:.4}", self.error_rate()),
            stopped_on_final = self.stopped_on_final,
            "流式传输指标"
        );
    }
}
