//! 流式传输模块
//!
//! 打开服务端事件流，把字节流解码为类型化事件，并按顺序交给处理器。
//!
//! # 主要组件
//!
//! - `error`: 流式错误类型定义
//! - `metrics`: 单个流的指标
//! - `decoder`: 增量 SSE 行解码器
//! - `traits`: `StreamingEndpoint` / `StreamEventHandler` trait 定义
//! - `transport`: 读取循环
//! - `http_client`: reqwest 端点实现

pub mod decoder;
pub mod error;
pub mod http_client;
pub mod metrics;
pub mod traits;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

// 重新导出核心类型
pub use decoder::{SseLine, SseLineDecoder, DEFAULT_EVENT_PREFIX};
pub use error::StreamError;
pub use http_client::HttpStreamClient;
pub use metrics::StreamMetrics;
pub use traits::{
    reqwest_stream_to_stream_response, StreamEventHandler, StreamResponse, StreamingEndpoint,
};
pub use transport::StreamTransport;
