//! 引用来源类型
//!
//! 助手回答所引用的来源，分为文档片段和网页两类。
//! 线上格式通过 `type` 字段区分变体。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// 占位来源在缺少名称时使用的名称
pub const UNKNOWN_SOURCE_NAME: &str = "Unknown Source";

/// 文档来源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DocumentSource {
    /// 文档名称
    #[serde(default)]
    pub name: String,
    /// 引用的文档片段
    #[serde(default)]
    pub content: String,
    /// 文档位置
    #[serde(default)]
    pub location: String,
    /// 预签名下载地址
    #[serde(default)]
    pub presigned_url: String,
    /// 页码（线上可能是字符串或数字）
    #[serde(default, deserialize_with = "string_or_number")]
    pub page_number: String,
    /// 相关度分数
    #[serde(default)]
    pub score: f64,
}

/// 网页来源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WebSource {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub score: f64,
}

/// 引用来源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Source {
    Document(DocumentSource),
    Web(WebSource),
}

impl Source {
    /// 来源名称
    pub fn name(&self) -> &str {
        match self {
            Source::Document(doc) => &doc.name,
            Source::Web(web) => &web.name,
        }
    }

    /// 相关度分数
    pub fn score(&self) -> f64 {
        match self {
            Source::Document(doc) => doc.score,
            Source::Web(web) => web.score,
        }
    }

    /// 从任意 JSON 值解析来源
    ///
    /// 没有 `type` 字段的对象按文档来源解析（历史会话接口返回的旧格式）。
    /// 无法识别的变体不会中断消息落地：记录警告并返回一个内容为空的
    /// 文档占位来源（保留原始名称，没有名称时使用 [`UNKNOWN_SOURCE_NAME`]）。
    pub fn from_value(value: Value) -> Source {
        if value.is_object() && value.get("type").is_none() {
            if let Ok(doc) = serde_json::from_value::<DocumentSource>(value.clone()) {
                return Source::Document(doc);
            }
        }

        match serde_json::from_value::<Source>(value.clone()) {
            Ok(source) => source,
            Err(e) => {
                let kind = value
                    .get("type")
                    .and_then(|t| t.as_str())
                    .unwrap_or("<missing>")
                    .to_string();
                warn!(source_type = %kind, error = %e, "无法识别的来源类型，使用占位来源");
                let name = value
                    .get("name")
                    .and_then(|n| n.as_str())
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or(UNKNOWN_SOURCE_NAME);
                Source::placeholder(name)
            }
        }
    }

    /// 内容为空的占位来源
    pub fn placeholder(name: &str) -> Source {
        Source::Document(DocumentSource {
            name: name.to_string(),
            ..DocumentSource::default()
        })
    }
}

/// 将 `sources` 负载规范化为数组
///
/// 单个对象包装为一元素数组，数组逐项解析，`null` 视为空列表。
pub fn normalize_sources(value: Option<Value>) -> Vec<Source> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.into_iter().map(Source::from_value).collect(),
        Some(other) => vec![Source::from_value(other)],
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_document_source() {
        let source = Source::from_value(json!({
            "type": "document",
            "name": "doc.pdf",
            "content": "x",
            "location": "u",
            "page_number": "1",
            "score": 0.9,
            "presigned_url": "u"
        }));
        match source {
            Source::Document(doc) => {
                assert_eq!(doc.name, "doc.pdf");
                assert_eq!(doc.page_number, "1");
                assert_eq!(doc.presigned_url, "u");
                assert!((doc.score - 0.9).abs() < f64::EPSILON);
            }
            other => panic!("期望文档来源，实际: {:?}", other),
        }
    }

    #[test]
    fn test_numeric_page_number() {
        let source = Source::from_value(json!({"type": "document", "name": "a", "page_number": 12}));
        assert!(matches!(source, Source::Document(ref d) if d.page_number == "12"));
    }

    #[test]
    fn test_parse_web_source() {
        let source = Source::from_value(json!({
            "type": "web",
            "name": "Rust",
            "url": "https://www.rust-lang.org",
            "snippet": "A language",
            "score": 0.5
        }));
        assert!(matches!(source, Source::Web(ref w) if w.url == "https://www.rust-lang.org"));
        assert_eq!(source.name(), "Rust");
    }

    #[test]
    fn test_unknown_source_becomes_placeholder() {
        let source = Source::from_value(json!({"type": "video", "name": "clip.mp4"}));
        assert_eq!(source, Source::placeholder("clip.mp4"));
        if let Source::Document(doc) = source {
            assert!(doc.content.is_empty());
        }
    }

    #[test]
    fn test_unknown_source_without_name() {
        let source = Source::from_value(json!({"type": "video"}));
        assert_eq!(source.name(), "Unknown Source");

        let blank = Source::from_value(json!("just a string"));
        assert_eq!(blank, Source::placeholder(UNKNOWN_SOURCE_NAME));
    }

    #[test]
    fn test_untyped_source_is_read_as_document() {
        let source = Source::from_value(json!({
            "name": "legacy.pdf",
            "page_number": "3",
            "location": "s3://bucket/legacy.pdf",
            "content": "excerpt"
        }));
        match source {
            Source::Document(doc) => {
                assert_eq!(doc.name, "legacy.pdf");
                assert_eq!(doc.page_number, "3");
                assert_eq!(doc.content, "excerpt");
            }
            other => panic!("期望文档来源，实际: {:?}", other),
        }
    }

    #[test]
    fn test_normalize_single_and_array() {
        let single = normalize_sources(Some(json!({"type": "web", "name": "a"})));
        assert_eq!(single.len(), 1);

        let many = normalize_sources(Some(json!([
            {"type": "web", "name": "a"},
            {"type": "document", "name": "b"}
        ])));
        assert_eq!(many.len(), 2);
        assert_eq!(many[1].name(), "b");

        assert!(normalize_sources(None).is_empty());
        assert!(normalize_sources(Some(Value::Null)).is_empty());
    }

    #[test]
    fn test_serialize_uses_type_tag() {
        let json = serde_json::to_value(Source::placeholder("x")).unwrap();
        assert_eq!(json["type"], "document");
        assert_eq!(json["name"], "x");
    }
}
