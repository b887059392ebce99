//! 消息协调模块
//!
//! 把流式事件累积为一次交换的回答，并落地为会话历史中的一条消息。
//!
//! - `accumulator`: 单次交换的累积器
//! - `format`: 回答文本规范化
//! - `state_machine`: 协调器状态机与两条落地路径

pub mod accumulator;
pub mod format;
pub mod state_machine;

pub use accumulator::Accumulator;
pub use format::format_answer;
pub use state_machine::{ExchangeOutcome, FinalizationPath, ReconcilerState, StreamReconciler};
