//! 流式传输错误类型
//!
//! 定义打开和读取事件流时可能发生的错误。
//! 单条记录的解析失败只在本地记录，不会作为流错误上报。

use thiserror::Error;

/// 流式传输错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// 网络错误：连接失败、连接被重置、读取中断
    #[error("网络错误: {0}")]
    Network(String),

    /// 连接超时
    #[error("连接超时")]
    Timeout,

    /// 记录或负载解析失败
    #[error("解析错误: {0}")]
    ParseError(String),

    /// 服务端返回非 2xx 状态
    #[error("服务端错误 ({status}): {message}")]
    ProviderError {
        /// HTTP 状态码
        status: u16,
        /// 响应体中的错误信息
        message: String,
    },

    /// 单行数据超过缓冲区上限
    #[error("缓冲区溢出")]
    BufferOverflow,
}

impl From<std::io::Error> for StreamError {
    fn from(err: std::io::Error) -> Self {
        StreamError::Network(err.to_string())
    }
}

impl From<reqwest::Error> for StreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StreamError::Timeout
        } else if err.is_connect() {
            StreamError::Network(format!("连接失败: {}", err))
        } else if err.is_request() {
            StreamError::Network(format!("请求错误: {}", err))
        } else {
            StreamError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StreamError {
    fn from(err: serde_json::Error) -> Self {
        StreamError::ParseError(err.to_string())
    }
}

impl StreamError {
    pub fn network(msg: impl Into<String>) -> Self {
        StreamError::Network(msg.into())
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        StreamError::ParseError(msg.into())
    }

    pub fn provider_error(status: u16, message: impl Into<String>) -> Self {
        StreamError::ProviderError {
            status,
            message: message.into(),
        }
    }

    /// 判断错误是否值得调用方重新提交
    ///
    /// 网络错误、超时以及 429 / 5xx 可以重试。核心本身从不自动重试。
    pub fn is_retryable(&self) -> bool {
        match self {
            StreamError::Network(_) => true,
            StreamError::Timeout => true,
            StreamError::ProviderError { status, .. } => *status == 429 || *status >= 500,
            StreamError::ParseError(_) => false,
            StreamError::BufferOverflow => false,
        }
    }

    /// 获取 HTTP 状态码（如果适用）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            StreamError::ProviderError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
