//! 数据模型
//!
//! - `source`: 引用来源
//! - `stream_event`: 流式事件及其线上格式
//! - `message`: 会话消息与请求体
//! - `history`: 服务端会话记录与会话列表

pub mod history;
pub mod message;
pub mod source;
pub mod stream_event;

pub use history::{ChatHistoryResponse, ChatInfo, ChatRecord, ChatSummary, Exchange};
pub use message::{ChatStreamRequest, Message};
pub use source::{normalize_sources, DocumentSource, Source, WebSource, UNKNOWN_SOURCE_NAME};
pub use stream_event::{FinalResponse, StreamEvent};
