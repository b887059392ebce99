//! 流式事件类型
//!
//! 将 `data: ` 记录中的 JSON 负载解码为封闭的 [`StreamEvent`] 枚举。
//! 未知的 `type` 值直接解码失败，由调用方跳过，不会被强制转换为其他变体。

use crate::models::source::{normalize_sources, Source};
use crate::streaming::error::StreamError;
use serde::Deserialize;
use serde_json::Value;

/// 权威的完整回答
#[derive(Debug, Clone, PartialEq)]
pub struct FinalResponse {
    pub complete_answer: String,
    pub sources: Vec<Source>,
    pub exchange_id: String,
    pub query: String,
    pub chat_id: String,
    /// 服务端为新会话生成的标题
    pub generated_title: Option<String>,
}

/// 流式事件
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// 回答文本增量
    Answer {
        content: String,
        exchange_id: Option<String>,
    },
    /// 回答文本已全部接收，来源可能仍在路上
    AnswerComplete,
    /// 一批引用来源
    Sources { sources: Vec<Source> },
    /// 完整回答，取代之前累积的所有内容
    FinalResponse(FinalResponse),
}

impl StreamEvent {
    /// 从单条记录的 JSON 负载解析事件
    pub fn parse(payload: &str) -> Result<Self, StreamError> {
        let wire: WireEvent = serde_json::from_str(payload)?;
        Ok(wire.into())
    }

    /// 事件类型名称（用于日志）
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Answer { .. } => "answer",
            StreamEvent::AnswerComplete => "answer_complete",
            StreamEvent::Sources { .. } => "sources",
            StreamEvent::FinalResponse(_) => "final_response",
        }
    }

    /// 是否为终止事件
    pub fn is_final(&self) -> bool {
        matches!(self, StreamEvent::FinalResponse(_))
    }
}

// ============================================================================
// 线上格式
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireEvent {
    Answer {
        #[serde(default)]
        data: Option<AnswerData>,
        #[serde(rename = "exchangeId", default)]
        exchange_id: Option<String>,
    },
    AnswerComplete {},
    Sources {
        #[serde(default)]
        sources: Option<SourcesEnvelope>,
    },
    FinalResponse {
        data: FinalResponseData,
    },
}

#[derive(Debug, Deserialize)]
struct AnswerData {
    #[serde(default)]
    content: String,
    #[serde(rename = "exchangeId", default)]
    exchange_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SourcesEnvelope {
    #[serde(default)]
    sources: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct FinalResponseData {
    complete_answer: String,
    #[serde(default)]
    sources: Option<Value>,
    #[serde(rename = "exchangeId")]
    exchange_id: String,
    #[serde(default)]
    query: String,
    #[serde(default)]
    chat_id: String,
    #[serde(rename = "generatedTitle", default)]
    generated_title: Option<String>,
}

impl From<WireEvent> for StreamEvent {
    fn from(wire: WireEvent) -> Self {
        match wire {
            WireEvent::Answer { data, exchange_id } => {
                let (content, nested_id) = match data {
                    Some(data) => (data.content, data.exchange_id),
                    None => (String::new(), None),
                };
                StreamEvent::Answer {
                    content,
                    exchange_id: exchange_id
                        .filter(|id| !id.is_empty())
                        .or(nested_id)
                        .filter(|id| !id.is_empty()),
                }
            }
            WireEvent::AnswerComplete {} => StreamEvent::AnswerComplete,
            WireEvent::Sources { sources } => StreamEvent::Sources {
                sources: normalize_sources(sources.and_then(|s| s.sources)),
            },
            WireEvent::FinalResponse { data } => StreamEvent::FinalResponse(FinalResponse {
                complete_answer: data.complete_answer,
                sources: normalize_sources(data.sources),
                exchange_id: data.exchange_id,
                query: data.query,
                chat_id: data.chat_id,
                generated_title: data.generated_title.filter(|t| !t.is_empty()),
            }),
        }
    }
}
