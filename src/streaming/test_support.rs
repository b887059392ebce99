//! 测试辅助：内存端点与记录型处理器

use crate::models::{ChatStreamRequest, StreamEvent};
use crate::streaming::error::StreamError;
use crate::streaming::traits::{StreamEventHandler, StreamResponse, StreamingEndpoint};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 返回预设 chunk 的端点
pub struct FakeEndpoint {
    chunks: Vec<Result<Bytes, StreamError>>,
    open_error: Option<StreamError>,
    opened: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<(ChatStreamRequest, String)>>>,
}

impl FakeEndpoint {
    pub fn new(chunks: Vec<Result<Bytes, StreamError>>) -> Self {
        Self {
            chunks,
            open_error: None,
            opened: Arc::new(AtomicUsize::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn from_chunks(chunks: Vec<&str>) -> Self {
        Self::new(
            chunks
                .into_iter()
                .map(|c| Ok(Bytes::from(c.to_string())))
                .collect(),
        )
    }

    pub fn failing(error: StreamError) -> Self {
        let mut endpoint = Self::new(Vec::new());
        endpoint.open_error = Some(error);
        endpoint
    }

    pub fn open_count(&self) -> Arc<AtomicUsize> {
        self.opened.clone()
    }

    pub fn last_request(&self) -> Arc<Mutex<Option<(ChatStreamRequest, String)>>> {
        self.last_request.clone()
    }
}

#[async_trait]
impl StreamingEndpoint for FakeEndpoint {
    async fn open(
        &self,
        request: &ChatStreamRequest,
        token: &str,
    ) -> Result<StreamResponse, StreamError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some((request.clone(), token.to_string()));

        if let Some(e) = &self.open_error {
            return Err(e.clone());
        }
        Ok(Box::pin(futures::stream::iter(self.chunks.clone())))
    }

    fn endpoint_name(&self) -> &str {
        "fake"
    }
}

/// 记录所有回调的处理器
#[derive(Debug, Default)]
pub struct RecordingHandler {
    pub events: Vec<StreamEvent>,
    pub errors: Vec<StreamError>,
    pub complete_count: usize,
}

impl RecordingHandler {
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events.iter().map(|e| e.kind()).collect()
    }
}

impl StreamEventHandler for RecordingHandler {
    fn on_event(&mut self, event: StreamEvent) {
        self.events.push(event);
    }

    fn on_error(&mut self, error: StreamError) {
        self.errors.push(error);
    }

    fn on_complete(&mut self) {
        self.complete_count += 1;
    }
}
