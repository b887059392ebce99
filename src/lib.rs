//! docchat 客户端核心
//!
//! 消费服务端事件流，把增量回答和引用来源协调为会话历史中的消息。
//!
//! - `models`: 事件、来源与消息类型
//! - `streaming`: 事件流读取与解码
//! - `reconciler`: 累积与落地状态机
//! - `session`: 会话入口、凭证守卫与历史存储
//! - `api`: 会话记录接口（重新加载、评分、改名、删除、列表）
//! - `config`: YAML 配置
//! - `telemetry`: 日志初始化

pub mod api;
pub mod config;
pub mod models;
pub mod reconciler;
pub mod session;
pub mod streaming;
pub mod telemetry;

pub use api::{ApiError, ChatApiClient, ConversationApi};
pub use config::ClientConfig;
pub use models::{
    ChatRecord, ChatStreamRequest, ChatSummary, FinalResponse, Message, Source, StreamEvent,
};
pub use reconciler::{ExchangeOutcome, FinalizationPath, StreamReconciler};
pub use session::{BearerCredential, ChatSession, InMemoryConversation, SubmitOutcome};
pub use streaming::{StreamError, StreamTransport};
