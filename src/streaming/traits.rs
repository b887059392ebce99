//! 流式传输 Trait 定义
//!
//! - `StreamingEndpoint`: 打开事件流，返回原始字节流
//! - `StreamEventHandler`: 接收解析后的事件以及结束、错误回调

use crate::models::{ChatStreamRequest, StreamEvent};
use crate::streaming::StreamError;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

/// 流式响应类型别名
///
/// 每个 Item 是一个 chunk 的字节数据或读取错误。
pub type StreamResponse = Pin<Box<dyn Stream<Item = Result<Bytes, StreamError>> + Send>>;

/// 流式端点
///
/// 负责发起请求并交出响应体字节流。非 2xx 状态应在这里转换为
/// [`StreamError::ProviderError`]。
#[async_trait]
pub trait StreamingEndpoint: Send + Sync {
    /// 发起流式请求
    ///
    /// # Arguments
    ///
    /// * `request` - 请求体 `{ question, chatId }`
    /// * `token` - Bearer token
    async fn open(
        &self,
        request: &ChatStreamRequest,
        token: &str,
    ) -> Result<StreamResponse, StreamError>;

    /// 端点名称，用于日志
    fn endpoint_name(&self) -> &str;
}

/// 流事件处理器
///
/// 对同一个流，回调严格按顺序、不重叠地调用。
/// `on_error` 之后不会再调用 `on_complete`，处理器需要自行收尾。
pub trait StreamEventHandler {
    /// 收到一个解析成功的事件
    fn on_event(&mut self, event: StreamEvent);

    /// 读取失败
    fn on_error(&mut self, error: StreamError);

    /// 流正常结束或因 `final_response` 提前结束，每次 `open_stream` 恰好一次
    fn on_complete(&mut self);
}

/// 将 reqwest 的 bytes_stream 转换为 StreamResponse
pub fn reqwest_stream_to_stream_response(response: reqwest::Response) -> StreamResponse {
    use futures::StreamExt;

    let stream = response.bytes_stream().map(|result| result.map_err(StreamError::from));

    Box::pin(stream)
}
