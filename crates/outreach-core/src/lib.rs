pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod provider;
pub mod store;
pub mod sync;
pub mod view;

// Re-export main types for convenience
pub use api::{DashboardApi, HttpApi};
pub use config::{api_base, Config, BACKEND_URL_ENV};
pub use error::ApiError;
pub use models::{
    next_connection_status, Analytics, DraftField, GeneratedPost, Message,
    MessageGenerationConfig, NewTargetDraft, Target, ViralPost,
};
pub use provider::{LlmProvider, MessageType};
pub use store::{SharedState, Tab, ViewState};
pub use sync::{Notice, NoticeLevel, SyncOrchestrator};
