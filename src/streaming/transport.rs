//! 流式传输层
//!
//! 打开事件流，逐 chunk 读取、切分记录、解析事件并按顺序交给处理器。
//!
//! 读取循环在以下任一情况结束：
//! - 源流结束：处理最后一行后调用 `on_complete`
//! - 投递了 `final_response` 事件：立即停止读取并调用 `on_complete`，剩余字节丢弃
//! - 读取失败：调用 `on_error`，不调用 `on_complete`

use crate::models::{ChatStreamRequest, StreamEvent};
use crate::session::guard::{BearerCredential, SessionGuard};
use crate::streaming::decoder::{SseLine, SseLineDecoder, DEFAULT_EVENT_PREFIX};
use crate::streaming::metrics::StreamMetrics;
use crate::streaming::traits::{StreamEventHandler, StreamResponse, StreamingEndpoint};
use futures::StreamExt;
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// 日志中负载预览的最大字符数
const PAYLOAD_PREVIEW_CHARS: usize = 120;

/// 流式传输
pub struct StreamTransport {
    endpoint: Arc<dyn StreamingEndpoint>,
    guard: Arc<dyn SessionGuard>,
    event_prefix: String,
    max_line_bytes: usize,
}

impl StreamTransport {
    pub fn new(endpoint: Arc<dyn StreamingEndpoint>, guard: Arc<dyn SessionGuard>) -> Self {
        Self {
            endpoint,
            guard,
            event_prefix: DEFAULT_EVENT_PREFIX.to_string(),
            max_line_bytes: SseLineDecoder::DEFAULT_MAX_LINE_BYTES,
        }
    }

    /// 设置记录前缀
    pub fn with_event_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.event_prefix = prefix.into();
        self
    }

    /// 设置单行上限
    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = max_line_bytes;
        self
    }

    /// 打开事件流并把事件交给 `handler`
    ///
    /// 凭证无效时不发起连接，也不调用任何回调。
    pub async fn open_stream<H>(
        &self,
        request: &ChatStreamRequest,
        credential: &BearerCredential,
        handler: &mut H,
    ) -> StreamMetrics
    where
        H: StreamEventHandler + ?Sized,
    {
        let mut metrics = StreamMetrics::new();

        if !self.guard.is_session_valid(credential) {
            debug!(chat_id = %request.chat_id, "会话无效，不打开事件流");
            metrics.finish();
            return metrics;
        }

        debug!(
            endpoint = self.endpoint.endpoint_name(),
            chat_id = %request.chat_id,
            "打开事件流"
        );

        match self.endpoint.open(request, &credential.token).await {
            Ok(source) => {
                self.consume_stream(source, handler, &mut metrics).await;
            }
            Err(e) => {
                error!(
                    endpoint = self.endpoint.endpoint_name(),
                    error = %e,
                    "打开事件流失败"
                );
                handler.on_error(e);
            }
        }

        metrics.finish();
        metrics.log_metrics(Some(&request.chat_id));
        metrics
    }

    /// 消费一个已打开的字节流
    pub async fn consume_stream<H>(
        &self,
        mut source: StreamResponse,
        handler: &mut H,
        metrics: &mut StreamMetrics,
    ) where
        H: StreamEventHandler + ?Sized,
    {
        let mut decoder = SseLineDecoder::with_options(&self.event_prefix, self.max_line_bytes);

        while let Some(chunk) = source.next().await {
            let bytes = match chunk {
                Ok(bytes) => bytes,
                Err(e) => {
                    error!(error = %e, "读取事件流失败");
                    handler.on_error(e);
                    return;
                }
            };
            metrics.record_chunk(bytes.len());

            let lines = match decoder.push(&bytes) {
                Ok(lines) => lines,
                Err(e) => {
                    error!(
                        buffered = decoder.buffered_len(),
                        limit = self.max_line_bytes,
                        "单行数据超过缓冲区上限"
                    );
                    handler.on_error(e);
                    return;
                }
            };

            for line in lines {
                if dispatch_line(line, handler, metrics).is_break() {
                    metrics.stopped_on_final = true;
                    debug!("收到 final_response，停止读取");
                    handler.on_complete();
                    return;
                }
            }
        }

        if let Some(line) = decoder.finish() {
            if dispatch_line(line, handler, metrics).is_break() {
                metrics.stopped_on_final = true;
            }
        }

        handler.on_complete();
    }
}

/// 解析一行并投递事件
///
/// 投递了 `final_response` 时返回 `Break`。
fn dispatch_line<H>(line: SseLine, handler: &mut H, metrics: &mut StreamMetrics) -> ControlFlow<()>
where
    H: StreamEventHandler + ?Sized,
{
    let payload = match line {
        SseLine::Data(payload) => payload,
        SseLine::Ignored(text) => {
            debug!(line = %preview(&text), "忽略无前缀的行");
            metrics.record_ignored_line();
            return ControlFlow::Continue(());
        }
    };

    match StreamEvent::parse(&payload) {
        Ok(event) => {
            let is_final = event.is_final();
            metrics.record_event();
            handler.on_event(event);
            if is_final {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }
        Err(e) => {
            warn!(error = %e, payload = %preview(&payload), "跳过无法解析的事件记录");
            metrics.record_parse_error();
            ControlFlow::Continue(())
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PAYLOAD_PREVIEW_CHARS {
        return text.to_string();
    }
    let head: String = text.chars().take(PAYLOAD_PREVIEW_CHARS).collect();
    format!("{}...", head)
}
