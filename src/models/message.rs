//! 会话消息与请求体

use crate::models::source::Source;
use serde::{Deserialize, Serialize};

/// 会话历史中的一条消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// 消息文本
    pub message: String,
    /// 是否为用户发送
    pub from_user: bool,
    /// 所属交换的 ID（用户消息为空）
    #[serde(default)]
    pub exchange_id: String,
    /// 引用来源（仅助手消息）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
    /// 用户评分
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
}

impl Message {
    /// 创建用户消息
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            message: text.into(),
            from_user: true,
            exchange_id: String::new(),
            sources: None,
            rating: None,
        }
    }

    /// 创建助手消息
    pub fn assistant(
        text: impl Into<String>,
        exchange_id: impl Into<String>,
        sources: Vec<Source>,
    ) -> Self {
        Self {
            message: text.into(),
            from_user: false,
            exchange_id: exchange_id.into(),
            sources: Some(sources),
            rating: None,
        }
    }
}

/// 流式接口的请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatStreamRequest {
    pub question: String,
    pub chat_id: String,
}

impl ChatStreamRequest {
    pub fn new(question: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            chat_id: chat_id.into(),
        }
    }
}
