//! View-state store
//!
//! One struct, one slot per piece of dashboard state. Every setter replaces its
//! slot outright; nothing here merges, validates or performs I/O.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::{
    Analytics, DraftField, GeneratedPost, Message, MessageGenerationConfig, NewTargetDraft,
    Target, ViralPost,
};
use crate::provider::{LlmProvider, MessageType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Targets,
    Messages,
    Posts,
}

impl Tab {
    pub fn all() -> [Tab; 4] {
        [Tab::Overview, Tab::Targets, Tab::Messages, Tab::Posts]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Targets => "Targets",
            Tab::Messages => "Messages",
            Tab::Posts => "Posts",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Overview => 0,
            Tab::Targets => 1,
            Tab::Messages => 2,
            Tab::Posts => 3,
        }
    }

    pub fn next(&self) -> Self {
        Self::all()[(self.index() + 1) % 4]
    }

    pub fn prev(&self) -> Self {
        Self::all()[(self.index() + 3) % 4]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub active_tab: Tab,

    // Server-owned caches
    pub analytics: Option<Analytics>,
    pub targets: Vec<Target>,
    pub messages: Vec<Message>,
    pub viral_posts: Vec<ViralPost>,
    pub generated_posts: Vec<GeneratedPost>,

    // Drafts
    pub new_target: NewTargetDraft,
    pub message_config: MessageGenerationConfig,

    pub busy: bool,
}

impl ViewState {
    pub fn new(message_config: MessageGenerationConfig) -> Self {
        Self {
            message_config,
            ..Default::default()
        }
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn set_draft_field(&mut self, field: DraftField, value: String) {
        self.new_target.set(field, value);
    }

    pub fn reset_draft(&mut self) {
        self.new_target = NewTargetDraft::default();
    }

    pub fn set_message_type(&mut self, message_type: MessageType) {
        self.message_config.message_type = message_type;
    }

    pub fn set_llm_provider(&mut self, provider: LlmProvider) {
        self.message_config.llm_provider = provider;
    }

    pub fn set_generation_target(&mut self, target_id: String) {
        self.message_config.target_id = target_id;
    }

    pub fn replace_analytics(&mut self, analytics: Analytics) {
        self.analytics = Some(analytics);
    }

    pub fn replace_targets(&mut self, targets: Vec<Target>) {
        self.targets = targets;
    }

    pub fn replace_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    pub fn replace_viral_posts(&mut self, viral_posts: Vec<ViralPost>) {
        self.viral_posts = viral_posts;
    }

    pub fn replace_generated_posts(&mut self, generated_posts: Vec<GeneratedPost>) {
        self.generated_posts = generated_posts;
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn target(&self, id: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }
}

/// Handle to the one [`ViewState`] shared by the sync tasks and the renderer.
///
/// Guards are short-lived: callers must not hold one across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct SharedState(Arc<Mutex<ViewState>>);

impl SharedState {
    pub fn new(state: ViewState) -> Self {
        Self(Arc::new(Mutex::new(state)))
    }

    pub fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn read<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        f(&self.lock())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn snapshot(&self) -> ViewState {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(id: &str, name: &str) -> Target {
        Target {
            id: id.to_string(),
            name: name.to_string(),
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            linkedin_url: String::new(),
            email: None,
            phone: None,
            location: None,
            profile_summary: None,
            recent_activity: None,
            connection_status: "not_connected".to_string(),
        }
    }

    #[test]
    fn test_initial_state_is_empty() {
        let state = ViewState::default();
        assert_eq!(state.active_tab, Tab::Overview);
        assert!(state.analytics.is_none());
        assert!(state.targets.is_empty());
        assert!(state.new_target.is_empty());
        assert!(!state.busy);
        assert_eq!(state.message_config.message_type, MessageType::ConnectionRequest);
        assert_eq!(state.message_config.llm_provider, LlmProvider::OpenAI);
    }

    #[test]
    fn test_replace_targets_is_wholesale() {
        let mut state = ViewState::default();
        state.replace_targets(vec![target("t1", "Alice"), target("t2", "Bob")]);
        state.replace_targets(vec![target("t3", "Carol")]);
        assert_eq!(state.targets.len(), 1);
        assert!(state.target("t1").is_none());
        assert_eq!(state.target("t3").map(|t| t.name.as_str()), Some("Carol"));
    }

    #[test]
    fn test_draft_field_setter_and_reset() {
        let mut state = ViewState::default();
        state.set_draft_field(DraftField::Name, "Alice".to_string());
        state.set_draft_field(DraftField::Company, "Acme".to_string());
        assert_eq!(state.new_target.name, "Alice");
        assert_eq!(state.new_target.company, "Acme");
        state.reset_draft();
        assert_eq!(state.new_target, NewTargetDraft::default());
    }

    #[test]
    fn test_generation_config_setters() {
        let mut state = ViewState::new(MessageGenerationConfig {
            llm_provider: LlmProvider::Ollama,
            ..Default::default()
        });
        assert_eq!(state.message_config.llm_provider, LlmProvider::Ollama);
        state.set_message_type(MessageType::FollowUp);
        state.set_llm_provider(LlmProvider::OpenAI);
        state.set_generation_target("t9".to_string());
        assert_eq!(state.message_config.message_type, MessageType::FollowUp);
        assert_eq!(state.message_config.llm_provider, LlmProvider::OpenAI);
        assert_eq!(state.message_config.target_id, "t9");
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Overview.next(), Tab::Targets);
        assert_eq!(Tab::Posts.next(), Tab::Overview);
        assert_eq!(Tab::Overview.prev(), Tab::Posts);
    }

    #[test]
    fn test_shared_state_sees_updates_from_clones() {
        let shared = SharedState::default();
        let other = shared.clone();
        other.update(|s| s.set_busy(true));
        assert!(shared.read(|s| s.busy));
        shared.update(|s| s.set_tab(Tab::Posts));
        assert_eq!(other.snapshot().active_tab, Tab::Posts);
    }
}
