//! Scripted in-memory backend for orchestrator tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::DashboardApi;
use crate::error::ApiError;
use crate::models::{
    Analytics, GenerateMessageRequest, GeneratedPost, Message, NewTargetDraft, ProviderStatus,
    Target, TargetStatusUpdate, ViralPost,
};
use crate::provider::LlmProvider;
use crate::store::SharedState;

/// A scripted reply. `Err` carries the backend detail, if any.
pub(crate) type Reply<T> = Result<T, Option<String>>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    FetchAnalytics,
    FetchTargets,
    CreateTarget(NewTargetDraft),
    UpdateTarget(String, TargetStatusUpdate),
    FetchMessages,
    GenerateMessage(GenerateMessageRequest),
    FetchViralPosts,
    GeneratePost,
    FetchGeneratedPosts,
    TestProvider(LlmProvider),
}

#[derive(Clone)]
pub(crate) struct Replies {
    pub analytics: Reply<Analytics>,
    pub targets: Reply<Vec<Target>>,
    pub create_target: Reply<Target>,
    pub update_target: Reply<Target>,
    pub messages: Reply<Vec<Message>>,
    pub generate_message: Reply<Message>,
    pub viral_posts: Reply<Vec<ViralPost>>,
    pub generate_post: Reply<GeneratedPost>,
    pub generated_posts: Reply<Vec<GeneratedPost>>,
    pub openai: Reply<ProviderStatus>,
    pub ollama: Reply<ProviderStatus>,
}

impl Default for Replies {
    fn default() -> Self {
        Self {
            analytics: Err(None),
            targets: Ok(Vec::new()),
            create_target: Err(None),
            update_target: Err(None),
            messages: Ok(Vec::new()),
            generate_message: Err(None),
            viral_posts: Ok(Vec::new()),
            generate_post: Err(None),
            generated_posts: Ok(Vec::new()),
            openai: Err(None),
            ollama: Err(None),
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeApi {
    replies: Mutex<Replies>,
    calls: Mutex<Vec<Call>>,
    probe: Mutex<Option<SharedState>>,
    busy_seen: Mutex<Vec<(Call, bool)>>,
    target_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
}

impl FakeApi {
    pub fn new(replies: Replies) -> Self {
        Self {
            replies: Mutex::new(replies),
            ..Default::default()
        }
    }

    pub fn script(&self, f: impl FnOnce(&mut Replies)) {
        f(&mut self.replies.lock().unwrap());
    }

    /// Record the busy flag of `state` at the moment each request arrives.
    pub fn watch_busy(&self, state: SharedState) {
        *self.probe.lock().unwrap() = Some(state);
    }

    /// Hold the next `fetch_targets` call until the sender fires.
    pub fn gate_next_targets_fetch(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.target_gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn busy_seen(&self) -> Vec<(Call, bool)> {
        self.busy_seen.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        if let Some(state) = self.probe.lock().unwrap().as_ref() {
            let busy = state.read(|s| s.busy);
            self.busy_seen.lock().unwrap().push((call.clone(), busy));
        }
        self.calls.lock().unwrap().push(call);
    }

    fn reply<T: Clone>(&self, pick: impl FnOnce(&Replies) -> &Reply<T>) -> Result<T, ApiError> {
        let replies = self.replies.lock().unwrap();
        pick(&replies).clone().map_err(|detail| ApiError::Backend {
            status: 500,
            detail,
        })
    }
}

#[async_trait]
impl DashboardApi for FakeApi {
    async fn fetch_analytics(&self) -> Result<Analytics, ApiError> {
        self.record(Call::FetchAnalytics);
        self.reply(|r| &r.analytics)
    }

    async fn fetch_targets(&self) -> Result<Vec<Target>, ApiError> {
        self.record(Call::FetchTargets);
        let gate = self.target_gates.lock().unwrap().pop_front();
        let reply = self.reply(|r| &r.targets);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        reply
    }

    async fn create_target(&self, draft: &NewTargetDraft) -> Result<Target, ApiError> {
        self.record(Call::CreateTarget(draft.clone()));
        self.reply(|r| &r.create_target)
    }

    async fn update_target(
        &self,
        target_id: &str,
        update: &TargetStatusUpdate,
    ) -> Result<Target, ApiError> {
        self.record(Call::UpdateTarget(target_id.to_string(), update.clone()));
        self.reply(|r| &r.update_target)
    }

    async fn fetch_messages(&self) -> Result<Vec<Message>, ApiError> {
        self.record(Call::FetchMessages);
        self.reply(|r| &r.messages)
    }

    async fn generate_message(
        &self,
        request: &GenerateMessageRequest,
    ) -> Result<Message, ApiError> {
        self.record(Call::GenerateMessage(request.clone()));
        self.reply(|r| &r.generate_message)
    }

    async fn fetch_viral_posts(&self) -> Result<Vec<ViralPost>, ApiError> {
        self.record(Call::FetchViralPosts);
        self.reply(|r| &r.viral_posts)
    }

    async fn generate_post(&self) -> Result<GeneratedPost, ApiError> {
        self.record(Call::GeneratePost);
        self.reply(|r| &r.generate_post)
    }

    async fn fetch_generated_posts(&self) -> Result<Vec<GeneratedPost>, ApiError> {
        self.record(Call::FetchGeneratedPosts);
        self.reply(|r| &r.generated_posts)
    }

    async fn test_provider(&self, provider: LlmProvider) -> Result<ProviderStatus, ApiError> {
        self.record(Call::TestProvider(provider));
        match provider {
            LlmProvider::OpenAI => self.reply(|r| &r.openai),
            LlmProvider::Ollama => self.reply(|r| &r.ollama),
        }
    }
}
