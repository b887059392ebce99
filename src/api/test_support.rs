//! 测试辅助：内存会话接口

use crate::api::error::ApiError;
use crate::api::traits::ConversationApi;
use crate::models::{ChatRecord, ChatSummary};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// 记录调用并返回预设结果的会话接口
#[derive(Default)]
pub struct FakeConversationApi {
    record: Option<ChatRecord>,
    summaries: Vec<ChatSummary>,
    error: Option<ApiError>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeConversationApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, record: ChatRecord) -> Self {
        self.record = Some(record);
        self
    }

    pub fn with_summaries(mut self, summaries: Vec<ChatSummary>) -> Self {
        self.summaries = summaries;
        self
    }

    /// 所有调用都返回该错误
    pub fn failing(error: ApiError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// 形如 `"PUT rating c1/e1=up token"` 的调用记录
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }

    fn record_call(&self, call: String) -> Result<(), ApiError> {
        self.calls.lock().push(call);
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ConversationApi for FakeConversationApi {
    async fn get_chat(&self, chat_id: &str, token: &str) -> Result<ChatRecord, ApiError> {
        self.record_call(format!("GET chat {chat_id} {token}"))?;
        self.record
            .clone()
            .ok_or_else(|| ApiError::NotFound(format!("chat {chat_id}")))
    }

    async fn list_chats(&self, token: &str) -> Result<Vec<ChatSummary>, ApiError> {
        self.record_call(format!("GET chats {token}"))?;
        Ok(self.summaries.clone())
    }

    async fn put_rating(
        &self,
        chat_id: &str,
        exchange_id: &str,
        rating: Option<&str>,
        token: &str,
    ) -> Result<(), ApiError> {
        self.record_call(format!(
            "PUT rating {chat_id}/{exchange_id}={} {token}",
            rating.unwrap_or("null")
        ))
    }

    async fn put_title(
        &self,
        chat_id: &str,
        title: Option<&str>,
        token: &str,
    ) -> Result<(), ApiError> {
        self.record_call(format!(
            "PUT title {chat_id}={} {token}",
            title.unwrap_or("null")
        ))
    }

    async fn delete_chat(&self, chat_id: &str, token: &str) -> Result<(), ApiError> {
        self.record_call(format!("DELETE chat {chat_id} {token}"))
    }
}
