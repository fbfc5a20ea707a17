//! Request and response schemas, one per endpoint
//!
//! Every response is decoded into an explicit type. A body that does not fit
//! is a [`crate::ApiError::Schema`] rather than a silently empty value. Inside
//! canvas content the per-section leniency of [`bmc_canvas::CanvasComponents`]
//! still applies.

use std::fmt;

use bmc_canvas::{CanvasComponents, HistoryEntry, SwotAnalysis, ValidationReport};
use serde::{Deserialize, Serialize};

/// Backend user identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Create user id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backend idea identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdeaId(pub String);

impl IdeaId {
    /// Create idea id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdeaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `POST /api/users/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/users/signup`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Response of login and signup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: UserId,
}

/// Body of `POST /api/business-ideas/idea`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdeaSubmission {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub idea: String,
    pub businessidea: String,
}

impl IdeaSubmission {
    /// Submission where the idea text fills both idea fields
    #[must_use]
    pub fn new(user_id: UserId, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            user_id,
            idea: text.clone(),
            businessidea: text,
        }
    }
}

/// Response of idea submission
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdeaCreated {
    #[serde(alias = "_id")]
    pub id: IdeaId,
}

/// Entry of `GET /api/business-ideas/{userId}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdeaSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: IdeaId,
    #[serde(default)]
    pub businessidea: Option<String>,
    #[serde(default)]
    pub idea: Option<String>,
}

impl IdeaSummary {
    /// Title shown on an idea card
    #[must_use]
    pub fn title(&self) -> &str {
        self.businessidea
            .as_deref()
            .or(self.idea.as_deref())
            .unwrap_or_default()
    }
}

/// Response of `GET /api/business-ideas/{userId}/{ideaId}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IdeaRecord {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<IdeaId>,
    #[serde(default)]
    pub idea: Option<String>,
    #[serde(default)]
    pub businessidea: Option<String>,
    #[serde(default)]
    pub bmc: Option<BmcEnvelope>,
}

impl IdeaRecord {
    /// Current canvas components, when the idea has a canvas
    #[must_use]
    pub fn components(&self) -> Option<&CanvasComponents> {
        self.bmc
            .as_ref()
            .and_then(|envelope| envelope.bmc.as_ref())
            .map(|body| &body.bmc_components)
    }
}

/// Canvas envelope of an idea: current canvas plus version history
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BmcEnvelope {
    #[serde(default)]
    pub bmc: Option<BmcBody>,
    /// Present only once history has been written; must be a list when present
    #[serde(default)]
    pub version_history: Option<Vec<HistoryEntry>>,
    #[serde(default)]
    pub version_id: Option<String>,
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<String>,
}

/// Current canvas with the reports generated for it
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BmcBody {
    #[serde(default)]
    pub bmc_components: CanvasComponents,
    #[serde(default)]
    pub validation_report: Option<ValidationReport>,
    #[serde(default)]
    pub swot_analysis: Option<SwotAnalysis>,
}

/// Response of `PUT /api/business-ideas/{ideaId}/version-history`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VersionHistoryResponse {
    pub version_history: Vec<HistoryEntry>,
}
