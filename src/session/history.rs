//! 会话历史存储
//!
//! 流式交换只追加消息，从不修改已有条目。追加在写锁内完成，
//! 读取方不会看到追加到一半的消息。整体替换只发生在重新加载会话时，
//! 评分是唯一会修改已有条目的操作。

use crate::models::Message;
use crate::reconciler::format_answer;
use parking_lot::RwLock;

/// 会话历史存储
pub trait ConversationStore: Send + Sync {
    /// 追加一条消息
    fn append_message(&self, message: Message);

    /// 清除流式过程中的待定状态（未落地的预览文本等）
    fn reset_pending_state(&self);

    /// 追加一段未落地回答的文本增量
    fn append_pending(&self, _fragment: &str) {}

    /// 用服务端的会话记录替换全部消息
    fn replace_messages(&self, messages: Vec<Message>);

    /// 设置某次交换的助手消息评分，`None` 表示清除
    ///
    /// 返回是否找到对应消息。
    fn set_rating(&self, exchange_id: &str, rating: Option<String>) -> bool;
}

/// 内存会话历史
#[derive(Debug, Default)]
pub struct InMemoryConversation {
    messages: RwLock<Vec<Message>>,
    pending: RwLock<Option<String>>,
}

impl InMemoryConversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前消息快照
    pub fn messages(&self) -> Vec<Message> {
        self.messages.read().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }

    /// 助手消息数量
    pub fn assistant_message_count(&self) -> usize {
        self.messages.read().iter().filter(|m| !m.from_user).count()
    }

    pub fn last_message(&self) -> Option<Message> {
        self.messages.read().last().cloned()
    }

    /// 未落地回答的预览（已规范化）
    pub fn pending(&self) -> Option<String> {
        self.pending.read().as_deref().map(format_answer)
    }
}

impl ConversationStore for InMemoryConversation {
    fn append_message(&self, message: Message) {
        self.messages.write().push(message);
    }

    fn reset_pending_state(&self) {
        *self.pending.write() = None;
    }

    fn append_pending(&self, fragment: &str) {
        self.pending
            .write()
            .get_or_insert_with(String::new)
            .push_str(fragment);
    }

    fn replace_messages(&self, messages: Vec<Message>) {
        *self.messages.write() = messages;
        *self.pending.write() = None;
    }

    fn set_rating(&self, exchange_id: &str, rating: Option<String>) -> bool {
        let mut messages = self.messages.write();
        match messages
            .iter_mut()
            .find(|m| !m.from_user && m.exchange_id == exchange_id)
        {
            Some(message) => {
                message.rating = rating;
                true
            }
            None => false,
        }
    }
}
