//! 流式回答协调器
//!
//! 每次交换的状态机：`Idle → Streaming → Finalizing → Idle`。
//!
//! 一次交换有两条落地路径：
//! - `final_response` 事件：权威结果，直接使用事件中的回答、来源和交换 ID
//! - 兜底路径：流结束时从未收到 `final_response`，使用累积的内容
//!
//! 两条路径互斥。第一次落地会立即重置累积器，之后的兜底检查因交换 ID
//! 为空而不再追加消息，所以每次交换恰好追加一条助手消息。

use crate::models::{FinalResponse, Message, StreamEvent};
use crate::reconciler::accumulator::Accumulator;
use crate::reconciler::format::format_answer;
use crate::session::history::ConversationStore;
use crate::streaming::error::StreamError;
use crate::streaming::traits::StreamEventHandler;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 协调器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcilerState {
    /// 没有进行中的交换
    #[default]
    Idle,
    /// 正在接收事件
    Streaming,
    /// 正在落地消息
    Finalizing,
}

/// 落地路径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizationPath {
    FinalResponse,
    Fallback,
}

/// 一次交换的结局
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeOutcome {
    /// 已追加一条助手消息
    Finalized {
        path: FinalizationPath,
        exchange_id: String,
    },
    /// 流结束但没有可落地的内容（无回答文本或无交换 ID）
    Dropped,
    /// 传输失败，没有追加消息
    Failed(StreamError),
}

/// 流式回答协调器
pub struct StreamReconciler {
    state: ReconcilerState,
    accumulator: Accumulator,
    store: Arc<dyn ConversationStore>,
    outcome: Option<ExchangeOutcome>,
    resolved_chat_id: Option<String>,
    resolved_title: Option<String>,
}

impl StreamReconciler {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self {
            state: ReconcilerState::Idle,
            accumulator: Accumulator::new(),
            store,
            outcome: None,
            resolved_chat_id: None,
            resolved_title: None,
        }
    }

    pub fn state(&self) -> ReconcilerState {
        self.state
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    /// 最近一次交换的结局
    pub fn outcome(&self) -> Option<&ExchangeOutcome> {
        self.outcome.as_ref()
    }

    /// `final_response` 携带的会话 ID
    pub fn resolved_chat_id(&self) -> Option<&str> {
        self.resolved_chat_id.as_deref()
    }

    /// `final_response` 携带的会话标题
    pub fn resolved_title(&self) -> Option<&str> {
        self.resolved_title.as_deref()
    }

    /// 开始新的交换
    ///
    /// 创建空累积器并进入 `Streaming`。上一次交换如果还没结束，
    /// 其累积内容会被丢弃。
    pub fn begin_exchange(&mut self) {
        if self.state != ReconcilerState::Idle {
            warn!(
                state = ?self.state,
                exchange_id = self.accumulator.exchange_id(),
                "上一次交换未结束，丢弃其累积内容"
            );
        }
        self.accumulator.reset();
        self.outcome = None;
        self.resolved_chat_id = None;
        self.resolved_title = None;
        self.state = ReconcilerState::Streaming;
    }

    /// 处理一个事件
    pub fn handle_event(&mut self, event: StreamEvent) {
        if self.state != ReconcilerState::Streaming {
            debug!(event = event.kind(), state = ?self.state, "没有进行中的交换，忽略事件");
            return;
        }

        match event {
            StreamEvent::Answer {
                content,
                exchange_id,
            } => {
                self.accumulator.append_answer(&content);
                if let Some(id) = exchange_id {
                    if self.accumulator.adopt_exchange_id(&id) {
                        debug!(exchange_id = %id, "采用交换 ID");
                    }
                }
                if !content.is_empty() {
                    self.store.append_pending(&content);
                }
            }
            StreamEvent::AnswerComplete => {
                self.accumulator.mark_answer_complete();
                debug!(
                    exchange_id = self.accumulator.exchange_id(),
                    answer_len = self.accumulator.answer_text().len(),
                    "回答文本接收完毕，等待来源"
                );
            }
            StreamEvent::Sources { sources } => {
                debug!(count = sources.len(), "收到来源");
                self.accumulator.replace_sources(sources);
            }
            StreamEvent::FinalResponse(final_response) => {
                self.finalize_authoritative(final_response);
            }
        }
    }

    /// 兜底落地：流结束时调用
    ///
    /// 回答文本和交换 ID 都非空才追加消息，否则静默放弃。
    pub fn finalize_fallback(&mut self) {
        let was_streaming = self.state == ReconcilerState::Streaming;
        let accumulated = self.accumulator.take();

        if !accumulated.can_finalize() {
            if was_streaming {
                warn!(
                    has_answer = !accumulated.answer_text().is_empty(),
                    has_exchange_id = !accumulated.exchange_id().is_empty(),
                    "流已结束但没有可落地的回答，放弃本次交换"
                );
                self.store.reset_pending_state();
                self.outcome = Some(ExchangeOutcome::Dropped);
            }
            self.state = ReconcilerState::Idle;
            return;
        }

        self.state = ReconcilerState::Finalizing;
        let (answer_text, sources, exchange_id) = accumulated.into_parts();
        let message = Message::assistant(format_answer(&answer_text), exchange_id.clone(), sources);
        self.commit(message, FinalizationPath::Fallback, exchange_id);
    }

    /// 传输失败：丢弃累积内容，不追加消息
    pub fn abort(&mut self, error: StreamError) {
        self.accumulator.reset();
        if self.state == ReconcilerState::Streaming {
            warn!(error = %error, "传输失败，本次交换没有落地消息");
            self.store.reset_pending_state();
            self.outcome = Some(ExchangeOutcome::Failed(error));
        }
        self.state = ReconcilerState::Idle;
    }

    fn finalize_authoritative(&mut self, final_response: FinalResponse) {
        self.state = ReconcilerState::Finalizing;
        // 权威结果取代累积内容
        self.accumulator.reset();

        let FinalResponse {
            complete_answer,
            sources,
            exchange_id,
            query,
            chat_id,
            generated_title,
        } = final_response;

        debug!(exchange_id = %exchange_id, query = %query, "收到完整回答");
        if !chat_id.is_empty() {
            self.resolved_chat_id = Some(chat_id);
        }
        self.resolved_title = generated_title;

        let message = Message::assistant(format_answer(&complete_answer), exchange_id.clone(), sources);
        self.commit(message, FinalizationPath::FinalResponse, exchange_id);
    }

    fn commit(&mut self, message: Message, path: FinalizationPath, exchange_id: String) {
        info!(
            exchange_id = %exchange_id,
            path = ?path,
            answer_len = message.message.len(),
            source_count = message.sources.as_ref().map_or(0, |s| s.len()),
            "助手消息已落地"
        );
        self.store.append_message(message);
        self.store.reset_pending_state();
        self.outcome = Some(ExchangeOutcome::Finalized { path, exchange_id });
        self.state = ReconcilerState::Idle;
    }
}

impl StreamEventHandler for StreamReconciler {
    fn on_event(&mut self, event: StreamEvent) {
        self.handle_event(event);
    }

    fn on_error(&mut self, error: StreamError) {
        self.abort(error);
    }

    fn on_complete(&mut self) {
        self.finalize_fallback();
    }
}
