//! 会话接口 Trait 定义

use crate::api::error::ApiError;
use crate::models::{ChatRecord, ChatSummary};
use async_trait::async_trait;

/// 会话记录接口
///
/// 流式问答之外的会话管理操作。所有方法都携带 Bearer token，
/// 调用前的凭证检查由调用方负责。
#[async_trait]
pub trait ConversationApi: Send + Sync {
    /// 读取单个会话的全部交换
    async fn get_chat(&self, chat_id: &str, token: &str) -> Result<ChatRecord, ApiError>;

    /// 列出所有会话（按月份分组后展开）
    async fn list_chats(&self, token: &str) -> Result<Vec<ChatSummary>, ApiError>;

    /// 提交某次交换的评分，`None` 表示清除
    async fn put_rating(
        &self,
        chat_id: &str,
        exchange_id: &str,
        rating: Option<&str>,
        token: &str,
    ) -> Result<(), ApiError>;

    /// 修改会话标题
    async fn put_title(
        &self,
        chat_id: &str,
        title: Option<&str>,
        token: &str,
    ) -> Result<(), ApiError>;

    /// 删除会话
    async fn delete_chat(&self, chat_id: &str, token: &str) -> Result<(), ApiError>;
}
