//! 会话记录接口的数据模型
//!
//! 服务端保存的每次交换（问题 + 回答 + 来源）以及按月份分组的会话列表。

use crate::models::message::Message;
use crate::models::source::{normalize_sources, Source};
use crate::reconciler::format_answer;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 新会话的默认标题
pub const UNTITLED_CHAT: &str = "Untitled";

/// 服务端保存的一次交换
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exchange {
    pub exchange_id: String,
    #[serde(default)]
    pub question: String,
    /// 未经规范化的回答文本
    #[serde(default)]
    pub response: String,
    #[serde(default, deserialize_with = "lenient_sources")]
    pub sources: Vec<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default)]
    pub timestamp: String,
}

impl Exchange {
    /// 还原为一条用户消息和一条助手消息
    pub fn into_messages(self) -> [Message; 2] {
        let question = Message {
            message: self.question,
            from_user: true,
            exchange_id: self.exchange_id.clone(),
            sources: None,
            rating: None,
        };
        let answer = Message {
            message: format_answer(&self.response),
            from_user: false,
            exchange_id: self.exchange_id,
            sources: Some(self.sources),
            rating: self.rating,
        };
        [question, answer]
    }
}

/// 会话列表中的一项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatInfo {
    pub chat_id: String,
    #[serde(default = "default_chat_title")]
    pub chat_title: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<Vec<Exchange>>,
}

fn default_chat_title() -> String {
    UNTITLED_CHAT.to_string()
}

/// 单个会话的完整记录（`GET chat/{chatId}`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRecord {
    pub chat_id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub conversation: Vec<Exchange>,
}

impl ChatRecord {
    /// 按交换顺序展开为会话消息
    pub fn into_messages(self) -> Vec<Message> {
        self.conversation
            .into_iter()
            .flat_map(Exchange::into_messages)
            .collect()
    }
}

/// 会话列表响应（`GET chats`）
///
/// 月份键保持服务端返回的顺序。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistoryResponse {
    #[serde(default)]
    pub monthly_chat_sessions: IndexMap<String, Vec<ChatInfo>>,
}

/// 带月份的会话摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub month: String,
    pub chat_info: ChatInfo,
}

impl ChatHistoryResponse {
    /// 展开为扁平列表，月份内保持原有顺序
    pub fn into_summaries(self) -> Vec<ChatSummary> {
        self.monthly_chat_sessions
            .into_iter()
            .flat_map(|(month, chats)| {
                chats.into_iter().map(move |chat_info| ChatSummary {
                    month: month.clone(),
                    chat_info,
                })
            })
            .collect()
    }
}

fn lenient_sources<'de, D>(deserializer: D) -> Result<Vec<Source>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(normalize_sources(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_into_messages() {
        let record: ChatRecord = serde_json::from_value(json!({
            "chatId": "c1",
            "timestamp": "2024-05-01T10:00:00Z",
            "conversation": [
                {
                    "exchangeId": "e1",
                    "question": "What is Rust?",
                    "response": "\\\"A language\\\\",
                    "sources": [{"name": "book.pdf", "page_number": "2", "location": "s3://b", "content": "x"}],
                    "rating": "up",
                    "timestamp": "t1"
                },
                {"exchangeId": "e2", "question": "More?", "response": "Yes"}
            ]
        }))
        .unwrap();

        let messages = record.into_messages();
        assert_eq!(messages.len(), 4);
        assert!(messages[0].from_user);
        assert_eq!(messages[0].message, "What is Rust?");
        assert_eq!(messages[0].exchange_id, "e1");
        assert!(!messages[1].from_user);
        assert_eq!(messages[1].message, "A language");
        assert_eq!(messages[1].rating.as_deref(), Some("up"));
        assert_eq!(messages[1].sources.as_ref().unwrap()[0].name(), "book.pdf");
        assert_eq!(messages[3].message, "Yes");
        assert_eq!(messages[3].sources, Some(vec![]));
    }

    #[test]
    fn test_history_keeps_month_order() {
        let history: ChatHistoryResponse = serde_json::from_value(json!({
            "monthlyChatSessions": {
                "June 2024": [
                    {"chatId": "c3", "chatTitle": "Latest", "timestamp": "t3"}
                ],
                "May 2024": [
                    {"chatId": "c2", "chatTitle": "Second", "timestamp": "t2"},
                    {"chatId": "c1", "timestamp": "t1"}
                ]
            }
        }))
        .unwrap();

        let summaries = history.into_summaries();
        let ids: Vec<&str> = summaries.iter().map(|s| s.chat_info.chat_id.as_str()).collect();
        assert_eq!(ids, vec!["c3", "c2", "c1"]);
        assert_eq!(summaries[0].month, "June 2024");
        assert_eq!(summaries[2].month, "May 2024");
        assert_eq!(summaries[2].chat_info.chat_title, UNTITLED_CHAT);
    }

    #[test]
    fn test_empty_history() {
        let history: ChatHistoryResponse = serde_json::from_value(json!({})).unwrap();
        assert!(history.into_summaries().is_empty());
    }
}
