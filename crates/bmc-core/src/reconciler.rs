//! Version-history reconciler
//!
//! Holds the draft being edited and the most-recent-first list of saved
//! versions for the active idea. The backend owns the history; this list is
//! a cached copy merged with local edits and local deletions.
//!
//! Every backend-touching operation clears the last error on entry, records
//! the user-visible message on failure, and leaves `loading` cleared when the
//! call completes.

use bmc_canvas::{
    compute_next_version, BmcDraft, BmcVersion, CanvasField, HistoryEntry, NextVersion,
    VersionHistoryUpdate, VersionIdPolicy, VersionRecord,
};
use bmc_client::{IdeaApi, IdeaId, UserId};
use chrono::{DateTime, Local, SecondsFormat, Utc};
use tracing::{debug, info, warn};

use crate::error::{CoreError, Result};
use crate::store::{keys, KeyValueStore, KeyValueStoreExt};

/// Local display format of version dates
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const MISSING_IDS_ON_LOAD: &str = "User ID or Idea ID not found. Please log in again.";
const MISSING_IDS_ON_SAVE: &str = "User ID or Idea ID missing.";

/// Display date for a server timestamp
///
/// RFC 3339 timestamps are shown in local time; anything else is kept as is.
#[must_use]
pub fn display_date(timestamp: Option<&str>) -> String {
    let Some(raw) = timestamp else {
        return String::new();
    };
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_string(),
        |at| at.with_timezone(&Local).format(DATE_FORMAT).to_string(),
    )
}

/// Local version list for server-held history, order preserved
#[must_use]
pub fn load_history(entries: &[HistoryEntry]) -> Vec<BmcVersion> {
    entries
        .iter()
        .map(|entry| {
            BmcVersion::new(
                BmcDraft::from_components(&entry.bmc),
                display_date(entry.timestamp.as_deref()),
            )
            .with_version_id(entry.version_id.clone())
            .with_parent(entry.parent_version_id.clone())
        })
        .collect()
}

/// Draft and version list of the active idea
#[derive(Debug)]
pub struct VersionReconciler<A, S> {
    api: A,
    store: S,
    policy: VersionIdPolicy,
    draft: BmcDraft,
    versions: Vec<BmcVersion>,
    error: Option<String>,
    loading: bool,
}

impl<A: IdeaApi, S: KeyValueStore> VersionReconciler<A, S> {
    /// Create reconciler with an empty draft and no versions
    #[inline]
    #[must_use]
    pub fn new(api: A, store: S) -> Self {
        Self {
            api,
            store,
            policy: VersionIdPolicy::default(),
            draft: BmcDraft::empty(),
            versions: Vec::new(),
            error: None,
            loading: false,
        }
    }

    /// With version id policy
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: VersionIdPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current draft
    #[inline]
    #[must_use]
    pub fn draft(&self) -> &BmcDraft {
        &self.draft
    }

    /// Saved versions, most recent first
    #[inline]
    #[must_use]
    pub fn versions(&self) -> &[BmcVersion] {
        &self.versions
    }

    /// Last user-visible error, cleared when the next operation starts
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Check if a backend call is outstanding
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Backing store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Linkage the next saved version would get
    #[must_use]
    pub fn compute_next_version(&self) -> NextVersion {
        compute_next_version(&self.versions)
    }

    /// Reload draft and versions of the active idea from the backend
    ///
    /// When the idea has no history yet, the list becomes one entry built
    /// from the current canvas. An idea without a canvas leaves local state
    /// untouched.
    ///
    /// # Errors
    ///
    /// Validation error without a stored user or idea id (no request is
    /// made), or the backend/store failure.
    pub async fn refresh(&mut self) -> Result<()> {
        self.error = None;
        let (user_id, idea_id) = self.session_ids(MISSING_IDS_ON_LOAD)?;

        self.loading = true;
        let fetched = self.api.fetch_idea(&user_id, &idea_id).await;
        self.loading = false;
        let record = self.track(fetched.map_err(CoreError::from))?;

        let Some(envelope) = record.bmc else {
            info!(%idea_id, "idea has no canvas yet");
            return Ok(());
        };

        let components = envelope.bmc.map(|body| body.bmc_components).unwrap_or_default();
        self.draft = BmcDraft::from_components(&components);
        self.versions = match envelope.version_history {
            Some(history) => load_history(&history),
            None => vec![BmcVersion::new(
                self.draft.clone(),
                display_date(envelope.updated_at.as_deref()),
            )
            .with_version_id(envelope.version_id)],
        };
        info!(%idea_id, versions = self.versions.len(), "loaded version history");

        let persisted = self.persist_all();
        self.track(persisted)
    }

    /// Save the draft as a new version on the backend
    ///
    /// On success the new entry is prepended and both draft and list are
    /// mirrored into the store. A store failure at that point is recorded in
    /// [`error`](Self::error) but does not fail the save. On backend failure
    /// the list is unchanged.
    ///
    /// # Errors
    ///
    /// Validation error without a stored user or idea id (no request is
    /// made), or the backend failure.
    pub async fn save_version(&mut self) -> Result<BmcVersion> {
        self.error = None;
        let (_, idea_id) = self.session_ids(MISSING_IDS_ON_SAVE)?;

        let next = compute_next_version(&self.versions);
        let now = Utc::now();
        let version_id = self.policy.assign(&next, now);
        let record = VersionRecord::new(
            version_id.clone(),
            next.parent_version_id.clone(),
            now.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.draft.to_bmc_data(),
        );
        let update = VersionHistoryUpdate::single(record);
        debug!(
            %idea_id,
            sequence = next.sequence,
            version_id = ?version_id,
            parent = ?next.parent_version_id,
            "saving version"
        );

        self.loading = true;
        let saved = self.api.update_version_history(&idea_id, &update).await;
        self.loading = false;
        let response = self.track(saved.map_err(CoreError::from))?;
        debug!(server_versions = response.version_history.len(), "version history updated");

        let entry = BmcVersion::new(
            self.draft.clone(),
            now.with_timezone(&Local).format(DATE_FORMAT).to_string(),
        )
        .with_version_id(version_id)
        .with_parent(next.parent_version_id);
        self.versions.insert(0, entry.clone());
        info!(%idea_id, versions = self.versions.len(), "saved version");

        if let Err(err) = self.persist_all() {
            // The backend holds the version, so it stays listed.
            self.fail(err);
        }
        Ok(entry)
    }

    /// Replace the draft with a saved version's content
    ///
    /// # Errors
    ///
    /// [`CoreError::VersionNotFound`] for an out-of-range index, or a store failure.
    pub fn load_version(&mut self, index: usize) -> Result<()> {
        self.error = None;
        self.check_index(index)?;
        self.draft = self.versions[index].draft.clone();
        self.persist_draft()
    }

    /// Drop a version from the local list; the backend keeps it
    ///
    /// # Errors
    ///
    /// [`CoreError::VersionNotFound`] for an out-of-range index, or a store failure.
    pub fn delete_version(&mut self, index: usize) -> Result<BmcVersion> {
        self.error = None;
        self.check_index(index)?;
        let removed = self.versions.remove(index);
        info!(index, version_id = ?removed.version_id, "removed version locally");

        let persisted = self.store.set_json(keys::VERSIONS, &self.versions).map_err(CoreError::from);
        self.track(persisted)?;
        Ok(removed)
    }

    /// Replace the draft with an all-empty one
    ///
    /// # Errors
    ///
    /// Returns a store failure.
    pub fn reset_draft(&mut self) -> Result<()> {
        self.error = None;
        self.draft = BmcDraft::empty();
        self.persist_draft()
    }

    /// Edit one section of the draft in memory
    pub fn set_field(&mut self, field: CanvasField, text: impl Into<String>) {
        *self.draft.field_mut(field) = text.into();
    }

    /// Write the draft to the store
    ///
    /// # Errors
    ///
    /// Returns a store failure.
    pub fn persist_draft(&mut self) -> Result<()> {
        let persisted = self.store.set_json(keys::DRAFT, &self.draft).map_err(CoreError::from);
        self.track(persisted)
    }

    /// Rehydrate draft and versions from the store
    ///
    /// Keys that are absent leave the corresponding state untouched.
    ///
    /// # Errors
    ///
    /// Returns a store failure, including stored JSON of the wrong shape.
    pub fn restore_local(&mut self) -> Result<()> {
        let draft = self.store.get_json::<BmcDraft>(keys::DRAFT);
        let draft = self.track(draft.map_err(CoreError::from))?;
        let versions = self.store.get_json::<Vec<BmcVersion>>(keys::VERSIONS);
        let versions = self.track(versions.map_err(CoreError::from))?;

        if let Some(draft) = draft {
            self.draft = draft;
        }
        if let Some(versions) = versions {
            self.versions = versions;
        }
        debug!(versions = self.versions.len(), "restored local state");
        Ok(())
    }

    fn persist_all(&self) -> Result<()> {
        self.store.set_json(keys::DRAFT, &self.draft)?;
        self.store.set_json(keys::VERSIONS, &self.versions)?;
        Ok(())
    }

    fn check_index(&mut self, index: usize) -> Result<()> {
        let len = self.versions.len();
        if index >= len {
            return Err(self.fail(CoreError::VersionNotFound { index, len }));
        }
        Ok(())
    }

    fn session_ids(&mut self, missing: &str) -> Result<(UserId, IdeaId)> {
        let user = self.store.get(keys::USER_ID).map_err(CoreError::from);
        let user = self.track(user)?;
        let idea = self.store.get(keys::IDEA_ID).map_err(CoreError::from);
        let idea = self.track(idea)?;

        match (user, idea) {
            (Some(user), Some(idea)) if !user.is_empty() && !idea.is_empty() => {
                Ok((UserId::new(user), IdeaId::new(idea)))
            }
            _ => Err(self.fail(CoreError::validation(missing))),
        }
    }

    fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        result.map_err(|err| self.fail(err))
    }

    fn fail(&mut self, err: CoreError) -> CoreError {
        warn!(error = %err, "operation failed");
        self.error = Some(err.user_message());
        err
    }
}
