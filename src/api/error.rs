//! 会话接口错误类型

use thiserror::Error;

/// 会话接口错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 凭证无效或已过期，没有发起请求
    #[error("会话已失效")]
    SessionExpired,

    /// 有交换正在进行，拒绝修改会话
    #[error("上一次交换仍在进行")]
    Busy,

    /// 会话没有配置接口端点
    #[error("未配置会话接口")]
    NotConfigured,

    /// 会话或交换不存在
    #[error("未找到: {0}")]
    NotFound(String),

    /// 服务端返回了除 404 以外的非 2xx 状态
    #[error("服务端错误 ({status}): {message}")]
    Status { status: u16, message: String },

    /// 2xx 响应，但响应体表示失败
    #[error("服务端拒绝请求: {0}")]
    Rejected(String),

    #[error("网络错误: {0}")]
    Network(String),

    #[error("连接超时")]
    Timeout,

    /// 响应体无法解析
    #[error("响应解析失败: {0}")]
    Decode(String),

    #[error("无效的地址: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if err.is_connect() {
            ApiError::Network(format!("连接失败: {}", err))
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
