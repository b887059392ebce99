//! 加载状态
//!
//! 提交问题时置位，交换以任何方式结束时清除。清除由 [`LoadingGuard`]
//! 在 drop 时完成，每次成功置位恰好对应一次清除，future 被取消时也一样。

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// 加载状态标志
#[derive(Debug, Default)]
pub struct LoadingState {
    loading: AtomicBool,
    cleared: AtomicU64,
}

impl LoadingState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// 累计清除次数
    pub fn clear_count(&self) -> u64 {
        self.cleared.load(Ordering::SeqCst)
    }

    /// 尝试置位
    ///
    /// 已在加载中时返回 `None`。
    pub fn try_begin(self: &Arc<Self>) -> Option<LoadingGuard> {
        self.loading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| LoadingGuard {
                state: Arc::clone(self),
            })
    }

    fn clear(&self) {
        self.loading.store(false, Ordering::SeqCst);
        self.cleared.fetch_add(1, Ordering::SeqCst);
    }
}

/// 加载状态守卫，drop 时清除标志
#[derive(Debug)]
pub struct LoadingGuard {
    state: Arc<LoadingState>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.clear();
    }
}
