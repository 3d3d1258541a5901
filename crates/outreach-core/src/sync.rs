//! Sync orchestrator
//!
//! Moves data between the backend and the [`SharedState`]. Fetches replace a
//! cache slot wholesale; mutating actions submit first and then re-fetch the
//! collection they touched, so the server stays the only source of truth.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, error, info, warn};

use crate::api::DashboardApi;
use crate::error::ApiError;
use crate::models::{GenerateMessageRequest, ProfileData, ProviderStatus, TargetStatusUpdate};
use crate::provider::LlmProvider;
use crate::store::{SharedState, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Message for the user after an action; the front end shows it until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, text: text.into() }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, text: text.into() }
    }
}

/// Server-owned collections cached in the view state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Analytics,
    Targets,
    Messages,
    ViralPosts,
    GeneratedPosts,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Analytics => "analytics",
            Collection::Targets => "targets",
            Collection::Messages => "messages",
            Collection::ViralPosts => "viral-posts",
            Collection::GeneratedPosts => "generated-posts",
        }
    }

    fn index(&self) -> usize {
        match self {
            Collection::Analytics => 0,
            Collection::Targets => 1,
            Collection::Messages => 2,
            Collection::ViralPosts => 3,
            Collection::GeneratedPosts => 4,
        }
    }
}

/// Per-collection fetch tickets. A response is applied only when its ticket is
/// newer than the last one applied to the same collection.
#[derive(Debug, Default)]
struct Tickets {
    issued: [u64; 5],
    applied: [u64; 5],
}

impl Tickets {
    fn issue(&mut self, collection: Collection) -> u64 {
        let slot = &mut self.issued[collection.index()];
        *slot += 1;
        *slot
    }

    fn accept(&mut self, collection: Collection, ticket: u64) -> bool {
        let applied = &mut self.applied[collection.index()];
        if ticket > *applied {
            *applied = ticket;
            true
        } else {
            false
        }
    }
}

#[derive(Clone)]
pub struct SyncOrchestrator {
    api: Arc<dyn DashboardApi>,
    state: SharedState,
    tickets: Arc<Mutex<Tickets>>,
}

impl SyncOrchestrator {
    pub fn new(api: Arc<dyn DashboardApi>, state: SharedState) -> Self {
        Self {
            api,
            state,
            tickets: Arc::new(Mutex::new(Tickets::default())),
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Populate every cache. The five fetches run concurrently and each one
    /// lands in its slot as soon as it resolves; failures are only logged.
    pub async fn bootstrap(&self) {
        info!("loading dashboard data");
        let (analytics, targets, messages, viral, generated) = tokio::join!(
            self.sync_analytics(),
            self.sync_targets(),
            self.sync_messages(),
            self.sync_viral_posts(),
            self.sync_generated_posts(),
        );
        let loaded = [analytics, targets, messages, viral, generated]
            .iter()
            .filter(|ok| **ok)
            .count();
        info!(loaded, total = 5, "dashboard data loaded");
    }

    /// Re-run the initial load on demand.
    pub async fn refresh(&self) {
        self.bootstrap().await;
    }

    pub async fn sync_analytics(&self) -> bool {
        self.sync(Collection::Analytics, self.api.fetch_analytics(), ViewState::replace_analytics)
            .await
    }

    pub async fn sync_targets(&self) -> bool {
        self.sync(Collection::Targets, self.api.fetch_targets(), ViewState::replace_targets)
            .await
    }

    pub async fn sync_messages(&self) -> bool {
        self.sync(Collection::Messages, self.api.fetch_messages(), ViewState::replace_messages)
            .await
    }

    pub async fn sync_viral_posts(&self) -> bool {
        self.sync(
            Collection::ViralPosts,
            self.api.fetch_viral_posts(),
            ViewState::replace_viral_posts,
        )
        .await
    }

    pub async fn sync_generated_posts(&self) -> bool {
        self.sync(
            Collection::GeneratedPosts,
            self.api.fetch_generated_posts(),
            ViewState::replace_generated_posts,
        )
        .await
    }

    /// Fetch one collection and replace its cache slot. Returns whether the
    /// slot was written; on failure or a superseded response it is left as is.
    async fn sync<T, F>(
        &self,
        collection: Collection,
        fetch: F,
        apply: fn(&mut ViewState, T),
    ) -> bool
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let ticket = self.lock_tickets().issue(collection);

        match fetch.await {
            Ok(value) => {
                let mut tickets = self.lock_tickets();
                if !tickets.accept(collection, ticket) {
                    debug!(collection = collection.as_str(), ticket, "dropping superseded response");
                    return false;
                }
                self.state.update(|s| apply(s, value));
                true
            }
            Err(e) => {
                warn!(collection = collection.as_str(), error = %e, "error fetching {}", collection.as_str());
                false
            }
        }
    }

    fn lock_tickets(&self) -> std::sync::MutexGuard<'_, Tickets> {
        self.tickets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submit the new-target draft. On success the draft is cleared and the
    /// target list re-fetched; on failure the draft is kept for another try.
    pub async fn create_target(&self) -> Option<Notice> {
        let draft = self.state.update(|s| {
            s.set_busy(true);
            s.new_target.clone()
        });
        info!(name = %draft.name, "creating target");

        let notice = match self.api.create_target(&draft).await {
            Ok(created) => {
                info!(id = %created.id, "target created");
                self.state.update(ViewState::reset_draft);
                self.sync_targets().await;
                None
            }
            Err(e) => {
                error!(error = %e, "error creating target");
                Some(Notice::error(format!("Error creating target: {}", e.user_message())))
            }
        };

        self.state.update(|s| s.set_busy(false));
        notice
    }

    /// Ask the backend to write a message for a cached target. Unknown ids are
    /// ignored without a request: the row the user acted on is already gone.
    pub async fn generate_message(&self, target_id: &str) -> Option<Notice> {
        let request = self.state.update(|s| {
            let target = s.target(target_id)?;
            let request = GenerateMessageRequest {
                target_id: target.id.clone(),
                profile_data: ProfileData::from(target),
                message_type: s.message_config.message_type,
                llm_provider: s.message_config.llm_provider,
            };
            s.set_generation_target(target_id.to_string());
            s.set_busy(true);
            Some(request)
        });
        let Some(request) = request else {
            debug!(target_id, "generate requested for unknown target, ignoring");
            return None;
        };

        info!(
            target_id,
            message_type = request.message_type.as_str(),
            provider = request.llm_provider.as_str(),
            "generating message"
        );
        let result = self.api.generate_message(&request).await;
        self.sync_messages().await;

        let notice = match result {
            Ok(message) => {
                info!(id = %message.id, "message generated");
                Notice::success("Message generated successfully!")
            }
            Err(e) => {
                error!(error = %e, "error generating message");
                Notice::error(format!("Error generating message: {}", e.user_message()))
            }
        };

        self.state.update(|s| s.set_busy(false));
        Some(notice)
    }

    pub async fn generate_viral_post(&self) -> Option<Notice> {
        self.state.update(|s| s.set_busy(true));
        info!("generating viral post");

        let result = self.api.generate_post().await;
        self.sync_generated_posts().await;

        let notice = match result {
            Ok(post) => {
                info!(id = %post.id, "viral post generated");
                Notice::success("Viral post generated successfully!")
            }
            Err(e) => {
                error!(error = %e, "error generating post");
                Notice::error(format!("Error generating post: {}", e.user_message()))
            }
        };

        self.state.update(|s| s.set_busy(false));
        Some(notice)
    }

    /// Move a cached target to a new connection status.
    pub async fn update_connection_status(&self, target_id: &str, status: &str) -> Option<Notice> {
        let known = self.state.update(|s| {
            let known = s.target(target_id).is_some();
            if known {
                s.set_busy(true);
            }
            known
        });
        if !known {
            debug!(target_id, "status change for unknown target, ignoring");
            return None;
        }

        info!(target_id, status, "updating connection status");
        let update = TargetStatusUpdate {
            connection_status: status.to_string(),
        };
        let result = self.api.update_target(target_id, &update).await;
        self.sync_targets().await;

        let notice = match result {
            Ok(_) => None,
            Err(e) => {
                error!(error = %e, "error updating target");
                Some(Notice::error(format!("Error updating target: {}", e.user_message())))
            }
        };

        self.state.update(|s| s.set_busy(false));
        notice
    }

    /// Probe both AI providers at once and report them together.
    pub async fn test_connections(&self) -> Notice {
        info!("testing provider connections");
        let (openai, ollama) = tokio::join!(
            self.api.test_provider(LlmProvider::OpenAI),
            self.api.test_provider(LlmProvider::Ollama),
        );

        let line = |provider: LlmProvider, result: Result<ProviderStatus, ApiError>| match result {
            Ok(status) => format!("{}: {}", provider.display_name(), status.status),
            Err(e) => {
                error!(provider = provider.as_str(), error = %e, "error testing connection");
                format!("{}: request failed ({})", provider.display_name(), e.user_message())
            }
        };

        Notice::info(format!(
            "{}\n{}",
            line(LlmProvider::OpenAI, openai),
            line(LlmProvider::Ollama, ollama)
        ))
    }
}
