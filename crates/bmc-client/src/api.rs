//! Backend collaborator contract
//!
//! The rest of the workspace talks to the backend only through these traits.
//! [`crate::HttpBackend`] implements them over HTTP; tests substitute mocks.

use std::sync::Arc;

use async_trait::async_trait;
use bmc_canvas::VersionHistoryUpdate;

use crate::error::ApiError;
use crate::schema::{
    AuthResponse, Credentials, IdeaCreated, IdeaId, IdeaRecord, IdeaSubmission, IdeaSummary,
    SignupRequest, UserId, VersionHistoryResponse,
};

/// Idea storage and version history
#[async_trait]
pub trait IdeaApi: Send + Sync {
    /// Store a new business idea
    async fn submit_idea(&self, submission: &IdeaSubmission) -> Result<IdeaCreated, ApiError>;

    /// Fetch one idea with its canvas and history
    async fn fetch_idea(&self, user_id: &UserId, idea_id: &IdeaId)
        -> Result<IdeaRecord, ApiError>;

    /// Append to an idea's version history
    async fn update_version_history(
        &self,
        idea_id: &IdeaId,
        update: &VersionHistoryUpdate,
    ) -> Result<VersionHistoryResponse, ApiError>;

    /// List a user's ideas
    async fn list_ideas(&self, user_id: &UserId) -> Result<Vec<IdeaSummary>, ApiError>;
}

/// Authentication
#[async_trait]
pub trait UserApi: Send + Sync {
    /// Log in with email and password
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;

    /// Create an account
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError>;
}

#[async_trait]
impl<T: IdeaApi + ?Sized> IdeaApi for Arc<T> {
    async fn submit_idea(&self, submission: &IdeaSubmission) -> Result<IdeaCreated, ApiError> {
        (**self).submit_idea(submission).await
    }

    async fn fetch_idea(
        &self,
        user_id: &UserId,
        idea_id: &IdeaId,
    ) -> Result<IdeaRecord, ApiError> {
        (**self).fetch_idea(user_id, idea_id).await
    }

    async fn update_version_history(
        &self,
        idea_id: &IdeaId,
        update: &VersionHistoryUpdate,
    ) -> Result<VersionHistoryResponse, ApiError> {
        (**self).update_version_history(idea_id, update).await
    }

    async fn list_ideas(&self, user_id: &UserId) -> Result<Vec<IdeaSummary>, ApiError> {
        (**self).list_ideas(user_id).await
    }
}

#[async_trait]
impl<T: UserApi + ?Sized> UserApi for Arc<T> {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        (**self).login(credentials).await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        (**self).signup(request).await
    }
}
