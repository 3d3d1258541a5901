use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::DashboardApi;
use crate::error::ApiError;
use crate::models::{
    Analytics, GenerateMessageRequest, GeneratedPost, Message, NewTargetDraft, ProviderStatus,
    Target, TargetStatusUpdate, ViralPost,
};
use crate::provider::LlmProvider;

/// reqwest-backed client for the dashboard's `/api` routes
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    /// `api_base` is the full API root, e.g. `https://host/api`.
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = api_base.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "backend URL must start with http:// or https://, got '{}'",
                api_base
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "backend request");
        self.client.request(method, url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request(Method::GET, path).send().await?;
        decode(path, response).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(method, path).json(body).send().await?;
        decode(path, response).await
    }
}

async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(ApiError::from_response(status.as_u16(), &text));
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })
}

#[async_trait]
impl DashboardApi for HttpApi {
    async fn fetch_analytics(&self) -> Result<Analytics, ApiError> {
        self.get("/analytics").await
    }

    async fn fetch_targets(&self) -> Result<Vec<Target>, ApiError> {
        self.get("/targets").await
    }

    async fn create_target(&self, draft: &NewTargetDraft) -> Result<Target, ApiError> {
        self.send_json(Method::POST, "/targets", draft).await
    }

    async fn update_target(
        &self,
        target_id: &str,
        update: &TargetStatusUpdate,
    ) -> Result<Target, ApiError> {
        let path = format!("/targets/{}", target_id);
        self.send_json(Method::PUT, &path, update).await
    }

    async fn fetch_messages(&self) -> Result<Vec<Message>, ApiError> {
        self.get("/messages").await
    }

    async fn generate_message(
        &self,
        request: &GenerateMessageRequest,
    ) -> Result<Message, ApiError> {
        self.send_json(Method::POST, "/messages/generate", request).await
    }

    async fn fetch_viral_posts(&self) -> Result<Vec<ViralPost>, ApiError> {
        self.get("/viral-posts").await
    }

    async fn generate_post(&self) -> Result<GeneratedPost, ApiError> {
        let path = "/generate-post";
        let response = self.request(Method::POST, path).send().await?;
        decode(path, response).await
    }

    async fn fetch_generated_posts(&self) -> Result<Vec<GeneratedPost>, ApiError> {
        self.get("/generated-posts").await
    }

    async fn test_provider(&self, provider: LlmProvider) -> Result<ProviderStatus, ApiError> {
        let path = format!("/test/{}", provider.as_str());
        self.get(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let api = HttpApi::new("http://localhost:8001/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8001/api");
    }

    #[test]
    fn test_non_http_base_is_rejected() {
        let err = HttpApi::new("localhost:8001/api", Duration::from_secs(5))
            .err()
            .expect("scheme-less URL should fail");
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_transport_error() {
        // Port 9 (discard) is closed on any sane test host.
        let api = HttpApi::new("http://127.0.0.1:9/api", Duration::from_secs(2)).unwrap();
        let err = api.fetch_targets().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(err.detail(), None);
    }
}
