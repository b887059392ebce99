//! 配置类型定义

use crate::config::yaml::ConfigError;
use crate::streaming::decoder::{SseLineDecoder, DEFAULT_EVENT_PREFIX};
use serde::{Deserialize, Serialize};
use url::Url;

/// 客户端配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// 服务端地址
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 流式接口路径
    #[serde(default = "default_stream_path")]
    pub stream_path: String,

    /// 会话记录接口地址，未设置时使用 `base_url`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    /// 连接超时（毫秒）
    ///
    /// 流建立后没有整体超时。
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// 记录前缀
    #[serde(default = "default_event_prefix")]
    pub event_prefix: String,

    /// 单行上限（字节）
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,

    /// 会话过期判断的提前量（秒）
    #[serde(default = "default_session_leeway_secs")]
    pub session_leeway_secs: i64,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_stream_path() -> String {
    "/chat/stream".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_event_prefix() -> String {
    DEFAULT_EVENT_PREFIX.to_string()
}

fn default_max_line_bytes() -> usize {
    SseLineDecoder::DEFAULT_MAX_LINE_BYTES
}

fn default_session_leeway_secs() -> i64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            stream_path: default_stream_path(),
            api_base_url: None,
            connect_timeout_ms: default_connect_timeout_ms(),
            event_prefix: default_event_prefix(),
            max_line_bytes: default_max_line_bytes(),
            session_leeway_secs: default_session_leeway_secs(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ClientConfig {
    /// 流式接口完整地址
    pub fn stream_url(&self) -> Result<Url, ConfigError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        base.join(&self.stream_path)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.stream_path, e)))
    }

    /// 会话记录接口的基础地址
    pub fn api_url(&self) -> Result<Url, ConfigError> {
        let raw = self.api_base_url.as_deref().unwrap_or(&self.base_url);
        Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.stream_url()?;
        self.api_url()?;
        if self.event_prefix.is_empty() {
            return Err(ConfigError::Invalid("event_prefix 不能为空".to_string()));
        }
        if self.max_line_bytes == 0 {
            return Err(ConfigError::Invalid("max_line_bytes 必须大于 0".to_string()));
        }
        if self.session_leeway_secs < 0 {
            return Err(ConfigError::Invalid(
                "session_leeway_secs 不能为负数".to_string(),
            ));
        }
        Ok(())
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别：trace / debug / info / warn / error
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
