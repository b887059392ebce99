//! 会话记录接口
//!
//! 流式问答之外的会话管理：重新加载会话、会话列表、评分、改名和删除。

pub mod client;
pub mod error;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::ChatApiClient;
pub use error::ApiError;
pub use traits::ConversationApi;
