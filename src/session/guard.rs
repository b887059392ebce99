//! 会话守卫
//!
//! 打开事件流之前检查凭证是否仍然有效。过期或为空的凭证不会发起连接。

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Bearer 凭证
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerCredential {
    /// 访问令牌
    pub token: String,
    /// 过期时间，`None` 表示不过期
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl BearerCredential {
    pub fn new(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// 在 `now + leeway` 时刻是否已过期
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway: Duration) -> bool {
        match self.expires_at {
            Some(expires_at) => now + leeway >= expires_at,
            None => false,
        }
    }
}

/// 会话守卫
pub trait SessionGuard: Send + Sync {
    fn is_session_valid(&self, credential: &BearerCredential) -> bool;
}

/// 基于过期时间的会话守卫
///
/// 令牌非空且在 `leeway` 之后仍未过期才视为有效。
#[derive(Debug, Clone)]
pub struct ExpiryGuard {
    leeway: Duration,
}

impl Default for ExpiryGuard {
    fn default() -> Self {
        Self::new(Duration::seconds(30))
    }
}

impl ExpiryGuard {
    pub fn new(leeway: Duration) -> Self {
        Self { leeway }
    }
}

impl SessionGuard for ExpiryGuard {
    fn is_session_valid(&self, credential: &BearerCredential) -> bool {
        !credential.token.trim().is_empty() && !credential.is_expired_at(Utc::now(), self.leeway)
    }
}
