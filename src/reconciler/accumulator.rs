//! 单次交换的累积器
//!
//! 保存流式过程中尚未落地的回答文本、来源和交换 ID。
//! 只由 [`StreamReconciler`](super::StreamReconciler) 修改，落地后立即重置。

use crate::models::Source;

/// 交换累积器
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accumulator {
    answer_text: String,
    sources: Vec<Source>,
    exchange_id: String,
    answer_complete: bool,
}

impl Accumulator {
    /// 创建空累积器
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加回答片段
    pub fn append_answer(&mut self, content: &str) {
        self.answer_text.push_str(content);
    }

    /// 采用交换 ID
    ///
    /// 先到先得：已有非空 ID 时忽略后续值，返回是否采用。
    pub fn adopt_exchange_id(&mut self, exchange_id: &str) -> bool {
        if !self.exchange_id.is_empty() || exchange_id.is_empty() {
            return false;
        }
        self.exchange_id = exchange_id.to_string();
        true
    }

    /// 用新一批来源替换当前来源
    pub fn replace_sources(&mut self, sources: Vec<Source>) {
        self.sources = sources;
    }

    pub fn mark_answer_complete(&mut self) {
        self.answer_complete = true;
    }

    pub fn answer_text(&self) -> &str {
        &self.answer_text
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn exchange_id(&self) -> &str {
        &self.exchange_id
    }

    pub fn is_answer_complete(&self) -> bool {
        self.answer_complete
    }

    /// 是否满足兜底落地的前提：回答文本与交换 ID 均非空
    pub fn can_finalize(&self) -> bool {
        !self.answer_text.is_empty() && !self.exchange_id.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// 重置为空
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 取出全部内容并重置
    pub fn take(&mut self) -> Accumulator {
        std::mem::take(self)
    }

    /// 拆分为 (回答文本, 来源, 交换 ID)
    pub fn into_parts(self) -> (String, Vec<Source>, String) {
        (self.answer_text, self.sources, self.exchange_id)
    }
}
