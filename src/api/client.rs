//! 基于 reqwest 的会话接口客户端

use crate::api::error::ApiError;
use crate::api::traits::ConversationApi;
use crate::config::{ClientConfig, ConfigError};
use crate::models::{ChatHistoryResponse, ChatRecord, ChatSummary};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// 错误响应体在错误信息中保留的最大长度
const MAX_ERROR_BODY_CHARS: usize = 512;

/// 服务端确认成功时的响应体
const ACK_SUCCESS: &str = "success";

#[derive(Serialize)]
struct RatingBody<'a> {
    rating: Option<&'a str>,
}

#[derive(Serialize)]
struct TitleBody<'a> {
    title: Option<&'a str>,
}

/// HTTP 会话接口客户端
///
/// 路径：
/// - `GET chat/{chatId}`
/// - `GET chats`
/// - `PUT chat/{chatId}/exchange/{exchangeId}/rating`
/// - `PUT chat/{chatId}/title`
/// - `DELETE chat/{chatId}`
pub struct ChatApiClient {
    client: Client,
    base: Url,
}

impl ChatApiClient {
    pub fn new(base: Url) -> Self {
        Self {
            client: Client::new(),
            base,
        }
    }

    /// 根据配置创建客户端
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let base = config.api_url()?;
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// 在基础地址后追加路径段，每段单独转义
    fn build_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        builder: RequestBuilder,
        token: &str,
        what: &str,
    ) -> Result<Response, ApiError> {
        let resp = builder
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        debug!(what = what, status = status.as_u16(), "会话接口请求完成");
        Ok(resp)
    }

    /// 读取确认型响应体
    async fn acknowledge(resp: Response, what: &str) -> Result<(), ApiError> {
        let body = resp.text().await?;
        parse_ack(&body, what)
    }
}

/// 解析确认型响应体：`"success"` 或 `{ "message": ... }`
fn parse_ack(body: &str, what: &str) -> Result<(), ApiError> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == ACK_SUCCESS {
        return Ok(());
    }

    let value: Value = serde_json::from_str(trimmed)?;
    match value {
        Value::String(s) if s == ACK_SUCCESS => Ok(()),
        Value::Object(map) => match map.get("message").and_then(Value::as_str) {
            Some("Not Found") => Err(ApiError::NotFound(what.to_string())),
            Some(message) => Err(ApiError::Rejected(message.to_string())),
            None => Err(ApiError::Decode(format!("无法识别的响应: {}", trimmed))),
        },
        _ => Err(ApiError::Decode(format!("无法识别的响应: {}", trimmed))),
    }
}

#[async_trait]
impl ConversationApi for ChatApiClient {
    async fn get_chat(&self, chat_id: &str, token: &str) -> Result<ChatRecord, ApiError> {
        let url = self.build_url(&["chat", chat_id])?;
        let what = format!("chat {chat_id}");
        let resp = self.send(self.client.get(url), token, &what).await?;
        Ok(resp.json::<ChatRecord>().await?)
    }

    async fn list_chats(&self, token: &str) -> Result<Vec<ChatSummary>, ApiError> {
        let url = self.build_url(&["chats"])?;
        let resp = self.send(self.client.get(url), token, "chats").await?;
        let history = resp.json::<ChatHistoryResponse>().await?;
        Ok(history.into_summaries())
    }

    async fn put_rating(
        &self,
        chat_id: &str,
        exchange_id: &str,
        rating: Option<&str>,
        token: &str,
    ) -> Result<(), ApiError> {
        let url = self.build_url(&["chat", chat_id, "exchange", exchange_id, "rating"])?;
        let what = format!("exchange {exchange_id}");
        let builder = self.client.put(url).json(&RatingBody { rating });
        let resp = self.send(builder, token, &what).await?;
        Self::acknowledge(resp, &what).await
    }

    async fn put_title(
        &self,
        chat_id: &str,
        title: Option<&str>,
        token: &str,
    ) -> Result<(), ApiError> {
        let url = self.build_url(&["chat", chat_id, "title"])?;
        let what = format!("chat {chat_id}");
        let builder = self.client.put(url).json(&TitleBody { title });
        let resp = self.send(builder, token, &what).await?;
        Self::acknowledge(resp, &what).await
    }

    async fn delete_chat(&self, chat_id: &str, token: &str) -> Result<(), ApiError> {
        let url = self.build_url(&["chat", chat_id])?;
        let what = format!("chat {chat_id}");
        let resp = self.send(self.client.delete(url), token, &what).await?;
        Self::acknowledge(resp, &what).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ChatApiClient {
        ChatApiClient::new(Url::parse(base).unwrap())
    }

    #[test]
    fn test_build_url_appends_segments() {
        let c = client("https://chat.example.com/api/");
        let url = c.build_url(&["chat", "c1", "exchange", "e1", "rating"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://chat.example.com/api/chat/c1/exchange/e1/rating"
        );

        let c = client("https://chat.example.com/api");
        assert_eq!(
            c.build_url(&["chats"]).unwrap().as_str(),
            "https://chat.example.com/api/chats"
        );
    }

    #[test]
    fn test_build_url_escapes_segments() {
        let c = client("http://localhost:8000");
        let url = c.build_url(&["chat", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/chat/a%2Fb%20c");
    }

    #[test]
    fn test_parse_ack_success() {
        assert!(parse_ack("success", "x").is_ok());
        assert!(parse_ack("\"success\"", "x").is_ok());
        assert!(parse_ack("  ", "x").is_ok());
    }

    #[test]
    fn test_parse_ack_not_found() {
        let err = parse_ack(r#"{"message":"Not Found"}"#, "chat c1").unwrap_err();
        assert_eq!(err, ApiError::NotFound("chat c1".to_string()));
    }

    #[test]
    fn test_parse_ack_other_message_is_rejected() {
        let err = parse_ack(r#"{"message":"Forbidden"}"#, "chat c1").unwrap_err();
        assert_eq!(err, ApiError::Rejected("Forbidden".to_string()));
    }

    #[test]
    fn test_parse_ack_unrecognized() {
        assert!(matches!(parse_ack("[1,2]", "x"), Err(ApiError::Decode(_))));
        assert!(matches!(parse_ack("nope", "x"), Err(ApiError::Decode(_))));
    }
}
