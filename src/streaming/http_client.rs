//! 基于 reqwest 的流式端点

use crate::config::{ClientConfig, ConfigError};
use crate::models::ChatStreamRequest;
use crate::streaming::error::StreamError;
use crate::streaming::traits::{reqwest_stream_to_stream_response, StreamResponse, StreamingEndpoint};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// 错误响应体在错误信息中保留的最大长度
const MAX_ERROR_BODY_CHARS: usize = 512;

/// HTTP 流式端点
///
/// 以 POST 发送 `{ question, chatId }`，携带 Bearer token，响应体即事件流。
pub struct HttpStreamClient {
    client: Client,
    url: String,
}

impl HttpStreamClient {
    /// 使用给定 URL 创建端点
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// 根据配置创建端点
    ///
    /// 只设置连接超时，流本身没有整体超时。
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let url = config.stream_url()?;
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl StreamingEndpoint for HttpStreamClient {
    async fn open(
        &self,
        request: &ChatStreamRequest,
        token: &str,
    ) -> Result<StreamResponse, StreamError> {
        let resp = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {token}"))
            .header("Accept", "text/event-stream")
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(StreamError::provider_error(status.as_u16(), message));
        }

        debug!(url = %self.url, status = status.as_u16(), "事件流已建立");
        Ok(reqwest_stream_to_stream_response(resp))
    }

    fn endpoint_name(&self) -> &str {
        &self.url
    }
}
