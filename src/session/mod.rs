//! 会话模块
//!
//! - `guard`: 凭证有效性检查
//! - `history`: 会话历史存储
//! - `loading`: 加载状态
//! - `chat`: `submit_question` 入口与会话管理操作

pub mod chat;
pub mod guard;
pub mod history;
pub mod loading;

pub use chat::{ChatSession, SubmitOutcome};
pub use guard::{BearerCredential, ExpiryGuard, SessionGuard};
pub use history::{ConversationStore, InMemoryConversation};
pub use loading::{LoadingGuard, LoadingState};
