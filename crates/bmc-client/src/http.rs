//! HTTP implementation of the backend traits

use async_trait::async_trait;
use bmc_canvas::VersionHistoryUpdate;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::{IdeaApi, UserApi};
use crate::config::ClientConfig;
use crate::error::{ApiError, Endpoint};
use crate::schema::{
    AuthResponse, Credentials, IdeaCreated, IdeaId, IdeaRecord, IdeaSubmission, IdeaSummary,
    SignupRequest, UserId, VersionHistoryResponse,
};

/// Backend reached over HTTP with JSON bodies
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create backend client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when the base URL is not an absolute
    /// http(s) URL or the underlying client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL '{}': {e}", config.base_url)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "base URL '{}' must use http or https",
                config.base_url
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Config(format!("base URL '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!(%endpoint, error = %e, "request failed");
            ApiError::Network { endpoint }
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            warn!(%endpoint, error = %e, "failed to read response body");
            ApiError::Network { endpoint }
        })?;

        if !status.is_success() {
            debug!(%endpoint, status = status.as_u16(), "backend rejected request");
            return Err(ApiError::from_response(endpoint, status.as_u16(), &body));
        }

        serde_json::from_slice(&body).map_err(|e| {
            warn!(%endpoint, error = %e, "response does not match schema");
            ApiError::Schema {
                endpoint,
                reason: e.to_string(),
            }
        })
    }
}

#[async_trait]
impl IdeaApi for HttpBackend {
    async fn submit_idea(&self, submission: &IdeaSubmission) -> Result<IdeaCreated, ApiError> {
        let url = self.url(&["api", "business-ideas", "idea"])?;
        self.execute(Endpoint::SubmitIdea, self.client.post(url).json(submission))
            .await
    }

    async fn fetch_idea(
        &self,
        user_id: &UserId,
        idea_id: &IdeaId,
    ) -> Result<IdeaRecord, ApiError> {
        let url = self.url(&["api", "business-ideas", user_id.as_str(), idea_id.as_str()])?;
        self.execute(Endpoint::FetchIdea, self.client.get(url)).await
    }

    async fn update_version_history(
        &self,
        idea_id: &IdeaId,
        update: &VersionHistoryUpdate,
    ) -> Result<VersionHistoryResponse, ApiError> {
        let url = self.url(&["api", "business-ideas", idea_id.as_str(), "version-history"])?;
        debug!(
            idea_id = %idea_id,
            version_id = ?update.version_id,
            "putting version history"
        );
        self.execute(Endpoint::UpdateVersionHistory, self.client.put(url).json(update))
            .await
    }

    async fn list_ideas(&self, user_id: &UserId) -> Result<Vec<IdeaSummary>, ApiError> {
        let url = self.url(&["api", "business-ideas", user_id.as_str()])?;
        self.execute(Endpoint::ListIdeas, self.client.get(url)).await
    }
}

#[async_trait]
impl UserApi for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let url = self.url(&["api", "users", "login"])?;
        self.execute(Endpoint::Login, self.client.post(url).json(credentials))
            .await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        let url = self.url(&["api", "users", "signup"])?;
        self.execute(Endpoint::Signup, self.client.post(url).json(request))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_base_url() {
        let err = HttpBackend::new(&ClientConfig::new().with_base_url("ftp://example.com")).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
        assert!(HttpBackend::new(&ClientConfig::new().with_base_url("not a url")).is_err());
    }

    #[test]
    fn joins_segments_onto_base_path() {
        let backend =
            HttpBackend::new(&ClientConfig::new().with_base_url("http://localhost:3002/")).unwrap();
        let url = backend.url(&["api", "users", "login"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3002/api/users/login");

        let prefixed =
            HttpBackend::new(&ClientConfig::new().with_base_url("http://host/backend")).unwrap();
        let url = prefixed.url(&["api", "business-ideas", "u 1"]).unwrap();
        assert_eq!(url.as_str(), "http://host/backend/api/business-ideas/u%201");
    }
}
