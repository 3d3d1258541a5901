//! Backend API seam
//!
//! Everything the dashboard knows about the server goes through [`DashboardApi`].
//! [`HttpApi`] is the real implementation; tests substitute a scripted fake.

pub mod http;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{
    Analytics, GenerateMessageRequest, GeneratedPost, Message, NewTargetDraft, ProviderStatus,
    Target, TargetStatusUpdate, ViralPost,
};
use crate::provider::LlmProvider;

pub use http::HttpApi;

#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// `GET /analytics`
    async fn fetch_analytics(&self) -> Result<Analytics, ApiError>;

    /// `GET /targets`
    async fn fetch_targets(&self) -> Result<Vec<Target>, ApiError>;

    /// `POST /targets`
    async fn create_target(&self, draft: &NewTargetDraft) -> Result<Target, ApiError>;

    /// `PUT /targets/{id}`
    async fn update_target(
        &self,
        target_id: &str,
        update: &TargetStatusUpdate,
    ) -> Result<Target, ApiError>;

    /// `GET /messages`
    async fn fetch_messages(&self) -> Result<Vec<Message>, ApiError>;

    /// `POST /messages/generate`
    async fn generate_message(&self, request: &GenerateMessageRequest)
        -> Result<Message, ApiError>;

    /// `GET /viral-posts`
    async fn fetch_viral_posts(&self) -> Result<Vec<ViralPost>, ApiError>;

    /// `POST /generate-post` (no body)
    async fn generate_post(&self) -> Result<GeneratedPost, ApiError>;

    /// `GET /generated-posts`
    async fn fetch_generated_posts(&self) -> Result<Vec<GeneratedPost>, ApiError>;

    /// `GET /test/{provider}`
    async fn test_provider(&self, provider: LlmProvider) -> Result<ProviderStatus, ApiError>;
}
