//! Testing utilities for the BMC workspace
//!
//! Shared fixtures and a recording stub backend.

#![allow(missing_docs)]

use std::collections::HashMap;

use async_trait::async_trait;
use bmc_canvas::{BmcDraft, BmcVersion, CanvasComponents, CanvasField, HistoryEntry, VersionHistoryUpdate};
use bmc_client::{
    ApiError, AuthResponse, Credentials, Endpoint, IdeaApi, IdeaCreated, IdeaId, IdeaRecord,
    IdeaSubmission, IdeaSummary, SignupRequest, UserApi, UserId, VersionHistoryResponse,
};
use parking_lot::Mutex;

pub const TEST_USER_ID: &str = "user-1";
pub const TEST_IDEA_ID: &str = "idea-1";

pub fn draft_with(fields: &[(CanvasField, &str)]) -> BmcDraft {
    fields
        .iter()
        .fold(BmcDraft::empty(), |draft, (field, text)| draft.with_field(*field, *text))
}

pub fn version(id: &str, draft: BmcDraft) -> BmcVersion {
    BmcVersion::new(draft, "2024-05-01 10:00:00").with_version_id(Some(id.to_string()))
}

pub fn components_fixture() -> CanvasComponents {
    serde_json::from_value(components_json()).unwrap()
}

pub fn history_entry(version_id: &str, parent: Option<&str>, timestamp: &str) -> HistoryEntry {
    HistoryEntry {
        version_id: Some(version_id.to_string()),
        parent_version_id: parent.map(str::to_string),
        timestamp: Some(timestamp.to_string()),
        bmc: components_fixture(),
    }
}

/// Idea as the backend returns it, with the given history
pub fn idea_record(history: Option<Vec<serde_json::Value>>) -> IdeaRecord {
    let mut bmc = serde_json::json!({
        "bmc": {
            "bmc_components": components_json(),
            "validation_report": {
                "overall_feasibility_score": 7.5,
                "segment_scores": { "Commuters": 8.0 },
                "suggestions": ["Add subscriptions"],
                "strengths": ["Low rent"],
                "risks": ["Weather"]
            },
            "swot_analysis": {
                "strengths": ["Mobile"],
                "weaknesses": ["Small"],
                "opportunities": ["Events"],
                "threats": ["Chains"]
            }
        },
        "version_id": "v1_seed",
        "updatedAt": "2024-05-01T10:00:00.000Z"
    });
    if let Some(history) = history {
        bmc["version_history"] = serde_json::Value::Array(history);
    }
    serde_json::from_value(serde_json::json!({
        "_id": TEST_IDEA_ID,
        "idea": "Coffee from cargo bikes",
        "businessidea": "Mobile coffee",
        "bmc": bmc
    }))
    .unwrap()
}

fn components_json() -> serde_json::Value {
    serde_json::json!({
        "key_partnerships": ["Roasters", "Bike shops"],
        "key_activities": ["Brewing"],
        "key_resources": ["Cargo bikes"],
        "value_proposition": "Fresh coffee wherever you are",
        "customer_relationships": ["Loyalty cards"],
        "channels": ["Street", "App"],
        "customer_segments": ["Commuters"],
        "cost_structure": ["Beans", "Repairs"],
        "revenue_streams": ["Cups"]
    })
}

/// Failure the stub answers every call with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubFailure {
    Network,
    Backend { status: u16, message: Option<String> },
}

impl StubFailure {
    fn to_error(&self, endpoint: Endpoint) -> ApiError {
        match self {
            Self::Network => ApiError::Network { endpoint },
            Self::Backend { status, message } => {
                let body = message
                    .as_ref()
                    .map(|m| serde_json::json!({ "message": m }).to_string())
                    .unwrap_or_default();
                ApiError::from_response(endpoint, *status, body.as_bytes())
            }
        }
    }
}

/// Backend stub that records requests and counts calls per endpoint
#[derive(Debug)]
pub struct StubBackend {
    idea: Mutex<IdeaRecord>,
    ideas: Mutex<Vec<IdeaSummary>>,
    user_id: UserId,
    created_id: IdeaId,
    failure: Mutex<Option<StubFailure>>,
    calls: Mutex<HashMap<Endpoint, usize>>,
    history_updates: Mutex<Vec<(IdeaId, VersionHistoryUpdate)>>,
    submissions: Mutex<Vec<IdeaSubmission>>,
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StubBackend {
    pub fn new() -> Self {
        Self {
            idea: Mutex::new(idea_record(None)),
            ideas: Mutex::new(Vec::new()),
            user_id: UserId::new(TEST_USER_ID),
            created_id: IdeaId::new(TEST_IDEA_ID),
            failure: Mutex::new(None),
            calls: Mutex::new(HashMap::new()),
            history_updates: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn with_idea(self, idea: IdeaRecord) -> Self {
        *self.idea.lock() = idea;
        self
    }

    pub fn with_ideas(self, ideas: Vec<IdeaSummary>) -> Self {
        *self.ideas.lock() = ideas;
        self
    }

    pub fn fail_with(&self, failure: StubFailure) {
        *self.failure.lock() = Some(failure);
    }

    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.calls.lock().get(&endpoint).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }

    pub fn history_updates(&self) -> Vec<(IdeaId, VersionHistoryUpdate)> {
        self.history_updates.lock().clone()
    }

    pub fn submissions(&self) -> Vec<IdeaSubmission> {
        self.submissions.lock().clone()
    }

    fn enter(&self, endpoint: Endpoint) -> Result<(), ApiError> {
        *self.calls.lock().entry(endpoint).or_insert(0) += 1;
        match self.failure.lock().as_ref() {
            Some(failure) => Err(failure.to_error(endpoint)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IdeaApi for StubBackend {
    async fn submit_idea(&self, submission: &IdeaSubmission) -> Result<IdeaCreated, ApiError> {
        self.enter(Endpoint::SubmitIdea)?;
        self.submissions.lock().push(submission.clone());
        Ok(IdeaCreated {
            id: self.created_id.clone(),
        })
    }

    async fn fetch_idea(
        &self,
        _user_id: &UserId,
        _idea_id: &IdeaId,
    ) -> Result<IdeaRecord, ApiError> {
        self.enter(Endpoint::FetchIdea)?;
        Ok(self.idea.lock().clone())
    }

    async fn update_version_history(
        &self,
        idea_id: &IdeaId,
        update: &VersionHistoryUpdate,
    ) -> Result<VersionHistoryResponse, ApiError> {
        self.enter(Endpoint::UpdateVersionHistory)?;
        self.history_updates
            .lock()
            .push((idea_id.clone(), update.clone()));
        let echoed = serde_json::to_value(&update.state.version_history)
            .and_then(serde_json::from_value)
            .map_err(|e| ApiError::Schema {
                endpoint: Endpoint::UpdateVersionHistory,
                reason: e.to_string(),
            })?;
        Ok(VersionHistoryResponse {
            version_history: echoed,
        })
    }

    async fn list_ideas(&self, _user_id: &UserId) -> Result<Vec<IdeaSummary>, ApiError> {
        self.enter(Endpoint::ListIdeas)?;
        Ok(self.ideas.lock().clone())
    }
}

#[async_trait]
impl UserApi for StubBackend {
    async fn login(&self, _credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.enter(Endpoint::Login)?;
        Ok(AuthResponse {
            user_id: self.user_id.clone(),
        })
    }

    async fn signup(&self, _request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        self.enter(Endpoint::Signup)?;
        Ok(AuthResponse {
            user_id: self.user_id.clone(),
        })
    }
}
