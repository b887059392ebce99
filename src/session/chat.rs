//! 会话入口
//!
//! `ChatSession::submit_question` 是界面进入核心的唯一入口：
//! 追加用户消息、打开事件流、把事件交给协调器，并在结束时清除加载状态。
//! 会话的重新加载、评分、改名和删除经由 `ConversationApi` 完成。

use crate::api::{ApiError, ChatApiClient, ConversationApi};
use crate::config::{ClientConfig, ConfigError};
use crate::models::{ChatStreamRequest, ChatSummary, Message};
use crate::reconciler::{ExchangeOutcome, StreamReconciler};
use crate::session::guard::{BearerCredential, ExpiryGuard, SessionGuard};
use crate::session::history::ConversationStore;
use crate::session::loading::LoadingState;
use crate::streaming::{HttpStreamClient, StreamMetrics, StreamTransport};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 一次提交的结果
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// 交换已结束
    Completed(ExchangeOutcome),
    /// 上一次交换仍在进行
    Busy,
    /// 凭证无效或已过期，没有发起请求
    SessionExpired,
    /// 问题为空
    EmptyQuestion,
}

impl SubmitOutcome {
    /// 交换因临时性错误失败，可以重新提交同一问题
    pub fn is_retryable(&self) -> bool {
        match self {
            SubmitOutcome::Completed(ExchangeOutcome::Failed(error)) => error.is_retryable(),
            _ => false,
        }
    }
}

fn new_chat_id() -> String {
    Uuid::new_v4().to_string()
}

/// 会话
pub struct ChatSession {
    transport: StreamTransport,
    guard: Arc<dyn SessionGuard>,
    store: Arc<dyn ConversationStore>,
    api: Option<Arc<dyn ConversationApi>>,
    credential: RwLock<BearerCredential>,
    chat_id: RwLock<String>,
    title: RwLock<Option<String>>,
    loading: Arc<LoadingState>,
    last_metrics: RwLock<Option<StreamMetrics>>,
}

impl ChatSession {
    /// 创建会话，会话 ID 为新生成的 UUID
    pub fn new(
        transport: StreamTransport,
        guard: Arc<dyn SessionGuard>,
        store: Arc<dyn ConversationStore>,
        credential: BearerCredential,
    ) -> Self {
        Self {
            transport,
            guard,
            store,
            api: None,
            credential: RwLock::new(credential),
            chat_id: RwLock::new(new_chat_id()),
            title: RwLock::new(None),
            loading: LoadingState::new(),
            last_metrics: RwLock::new(None),
        }
    }

    /// 根据配置创建使用 HTTP 端点的会话
    pub fn from_config(
        config: &ClientConfig,
        store: Arc<dyn ConversationStore>,
        credential: BearerCredential,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let endpoint = Arc::new(HttpStreamClient::from_config(config)?);
        let api = Arc::new(ChatApiClient::from_config(config)?);
        let guard: Arc<dyn SessionGuard> = Arc::new(ExpiryGuard::new(chrono::Duration::seconds(
            config.session_leeway_secs,
        )));
        let transport = StreamTransport::new(endpoint, guard.clone())
            .with_event_prefix(config.event_prefix.clone())
            .with_max_line_bytes(config.max_line_bytes);

        Ok(Self::new(transport, guard, store, credential).with_api(api))
    }

    /// 指定会话记录接口
    pub fn with_api(mut self, api: Arc<dyn ConversationApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// 指定已有会话 ID
    pub fn with_chat_id(self, chat_id: impl Into<String>) -> Self {
        *self.chat_id.write() = chat_id.into();
        self
    }

    pub fn chat_id(&self) -> String {
        self.chat_id.read().clone()
    }

    /// 会话标题（服务端生成或手动修改）
    pub fn title(&self) -> Option<String> {
        self.title.read().clone()
    }

    /// 更换凭证（例如刷新令牌之后）
    pub fn set_credential(&self, credential: BearerCredential) {
        *self.credential.write() = credential;
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn loading_state(&self) -> Arc<LoadingState> {
        self.loading.clone()
    }

    /// 最近一次流的指标
    pub fn last_metrics(&self) -> Option<StreamMetrics> {
        self.last_metrics.read().clone()
    }

    /// 提交问题
    ///
    /// 同一时间只允许一个交换。加载状态在返回前（或 future 被丢弃时）清除。
    pub async fn submit_question(&self, text: &str) -> SubmitOutcome {
        let question = text.trim();
        if question.is_empty() {
            return SubmitOutcome::EmptyQuestion;
        }

        let credential = self.credential.read().clone();
        if !self.guard.is_session_valid(&credential) {
            warn!("会话已失效，未提交问题");
            return SubmitOutcome::SessionExpired;
        }

        let Some(_loading) = self.loading.try_begin() else {
            warn!("上一次交换仍在进行，忽略本次提交");
            return SubmitOutcome::Busy;
        };

        let request_id = Uuid::new_v4().to_string();
        let request = ChatStreamRequest::new(question, self.ensure_chat_id());
        self.store.append_message(Message::user(question));

        info!(request_id = %request_id, chat_id = %request.chat_id, "开始交换");

        let mut reconciler = StreamReconciler::new(self.store.clone());
        reconciler.begin_exchange();

        let metrics = self
            .transport
            .open_stream(&request, &credential, &mut reconciler)
            .await;
        *self.last_metrics.write() = Some(metrics);

        if let Some(resolved) = reconciler.resolved_chat_id() {
            self.adopt_chat_id(resolved);
        }
        if let Some(title) = reconciler.resolved_title() {
            debug!(request_id = %request_id, title = %title, "会话标题已更新");
            *self.title.write() = Some(title.to_string());
        }

        let outcome = reconciler
            .outcome()
            .cloned()
            .unwrap_or(ExchangeOutcome::Dropped);
        match &outcome {
            ExchangeOutcome::Failed(error) => warn!(
                request_id = %request_id,
                retryable = error.is_retryable(),
                status = ?error.status_code(),
                error = %error,
                "交换失败"
            ),
            _ => info!(request_id = %request_id, outcome = ?outcome, "交换结束"),
        }

        SubmitOutcome::Completed(outcome)
    }

    /// 开始新会话：新的会话 ID，清空标题和消息
    pub fn start_new_chat(&self) -> Result<(), ApiError> {
        let Some(_loading) = self.loading.try_begin() else {
            return Err(ApiError::Busy);
        };
        self.reset_chat();
        Ok(())
    }

    /// 从服务端重新加载会话，返回加载的消息数
    ///
    /// 每次交换还原为一条用户消息和一条规范化后的助手消息。
    pub async fn load_conversation(&self, chat_id: &str) -> Result<usize, ApiError> {
        let (api, token) = self.api_context()?;
        let Some(_loading) = self.loading.try_begin() else {
            return Err(ApiError::Busy);
        };

        let record = api.get_chat(chat_id, &token).await?;
        let resolved = if record.chat_id.is_empty() {
            chat_id.to_string()
        } else {
            record.chat_id.clone()
        };
        let messages = record.into_messages();
        let count = messages.len();

        self.store.replace_messages(messages);
        *self.chat_id.write() = resolved;
        *self.title.write() = None;
        info!(chat_id = %chat_id, messages = count, "会话已加载");
        Ok(count)
    }

    /// 为某次交换评分，`None` 表示清除评分
    ///
    /// 服务端确认后才修改本地消息。
    pub async fn rate_exchange(
        &self,
        exchange_id: &str,
        rating: Option<&str>,
    ) -> Result<(), ApiError> {
        let (api, token) = self.api_context()?;
        let chat_id = self.chat_id();
        api.put_rating(&chat_id, exchange_id, rating, &token).await?;

        if !self
            .store
            .set_rating(exchange_id, rating.map(str::to_string))
        {
            warn!(exchange_id = %exchange_id, "本地会话中没有该交换的回答");
        }
        Ok(())
    }

    /// 修改会话标题
    pub async fn rename_chat(&self, title: &str) -> Result<(), ApiError> {
        let (api, token) = self.api_context()?;
        let chat_id = self.chat_id();
        api.put_title(&chat_id, Some(title), &token).await?;
        *self.title.write() = Some(title.to_string());
        Ok(())
    }

    /// 删除当前会话，成功后开始新会话
    pub async fn delete_chat(&self) -> Result<(), ApiError> {
        let (api, token) = self.api_context()?;
        let Some(_loading) = self.loading.try_begin() else {
            return Err(ApiError::Busy);
        };
        let chat_id = self.chat_id();
        api.delete_chat(&chat_id, &token).await?;
        info!(chat_id = %chat_id, "会话已删除");
        self.reset_chat();
        Ok(())
    }

    /// 列出服务端保存的所有会话
    pub async fn list_chats(&self) -> Result<Vec<ChatSummary>, ApiError> {
        let (api, token) = self.api_context()?;
        api.list_chats(&token).await
    }

    fn api_context(&self) -> Result<(Arc<dyn ConversationApi>, String), ApiError> {
        let api = self.api.clone().ok_or(ApiError::NotConfigured)?;
        let credential = self.credential.read().clone();
        if !self.guard.is_session_valid(&credential) {
            warn!("会话已失效，未调用会话接口");
            return Err(ApiError::SessionExpired);
        }
        Ok((api, credential.token))
    }

    fn reset_chat(&self) {
        *self.chat_id.write() = new_chat_id();
        *self.title.write() = None;
        self.store.replace_messages(Vec::new());
    }

    fn ensure_chat_id(&self) -> String {
        let mut chat_id = self.chat_id.write();
        if chat_id.is_empty() {
            *chat_id = new_chat_id();
        }
        chat_id.clone()
    }

    fn adopt_chat_id(&self, resolved: &str) {
        let mut chat_id = self.chat_id.write();
        if *chat_id != resolved {
            info!(previous = %chat_id, chat_id = %resolved, "采用服务端返回的会话 ID");
            *chat_id = resolved.to_string();
        }
    }
}
