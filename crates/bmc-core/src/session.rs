//! Login state, idea selection and idea submission
//!
//! The session owns no state of its own; everything lives in the
//! [`KeyValueStore`] under the keys in [`crate::store::keys`].

use bmc_client::{
    Credentials, IdeaApi, IdeaId, IdeaSubmission, IdeaSummary, SignupRequest, UserApi, UserId,
};
use tracing::info;

use crate::error::{CoreError, Result};
use crate::overview::IdeaOverview;
use crate::store::{keys, KeyValueStore};

/// Maximum length of a submitted idea, in characters
pub const MAX_IDEA_CHARS: usize = 500;

/// Client session against one backend and one store
#[derive(Debug)]
pub struct Session<A, S> {
    api: A,
    store: S,
}

impl<A, S> Session<A, S>
where
    A: IdeaApi + UserApi,
    S: KeyValueStore,
{
    /// Create session
    #[inline]
    #[must_use]
    pub fn new(api: A, store: S) -> Self {
        Self { api, store }
    }

    /// Backing store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored user id, if logged in
    ///
    /// # Errors
    ///
    /// Returns a store failure.
    pub fn user_id(&self) -> Result<Option<UserId>> {
        Ok(self
            .store
            .get(keys::USER_ID)?
            .filter(|id| !id.is_empty())
            .map(UserId::new))
    }

    /// Stored active idea id
    ///
    /// # Errors
    ///
    /// Returns a store failure.
    pub fn idea_id(&self) -> Result<Option<IdeaId>> {
        Ok(self
            .store
            .get(keys::IDEA_ID)?
            .filter(|id| !id.is_empty())
            .map(IdeaId::new))
    }

    /// Log in and remember the user id
    ///
    /// # Errors
    ///
    /// Validation error when either field is blank, or the backend failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserId> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(CoreError::validation("Please fill in all fields."));
        }
        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let auth = self.api.login(&credentials).await?;
        self.store.set(keys::USER_ID, auth.user_id.as_str())?;
        info!(user_id = %auth.user_id, "logged in");
        Ok(auth.user_id)
    }

    /// Create an account and remember the user id
    ///
    /// # Errors
    ///
    /// Validation error when a field is blank or the passwords differ, or the
    /// backend failure.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<UserId> {
        if [name.trim(), email.trim(), password, confirm_password]
            .iter()
            .any(|field| field.is_empty())
        {
            return Err(CoreError::validation("Please fill in all fields."));
        }
        if password != confirm_password {
            return Err(CoreError::validation("Passwords do not match."));
        }

        let request = SignupRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let auth = self.api.signup(&request).await?;
        self.store.set(keys::USER_ID, auth.user_id.as_str())?;
        info!(user_id = %auth.user_id, "signed up");
        Ok(auth.user_id)
    }

    /// Ideas of the logged-in user
    ///
    /// # Errors
    ///
    /// Validation error when not logged in, or the backend failure.
    pub async fn list_ideas(&self) -> Result<Vec<IdeaSummary>> {
        let user_id = self.require_user()?;
        Ok(self.api.list_ideas(&user_id).await?)
    }

    /// Make an idea the active one
    ///
    /// # Errors
    ///
    /// Returns a store failure.
    pub fn select_idea(&self, idea_id: &IdeaId) -> Result<()> {
        self.store.set(keys::IDEA_ID, idea_id.as_str())?;
        info!(%idea_id, "selected idea");
        Ok(())
    }

    /// Forget the active idea before entering a new one
    ///
    /// # Errors
    ///
    /// Returns a store failure.
    pub fn start_new_idea(&self) -> Result<()> {
        self.store.remove(keys::IDEA_ID)?;
        Ok(())
    }

    /// Submit a new idea and make it the active one
    ///
    /// # Errors
    ///
    /// Validation error when not logged in, when the text is blank or longer
    /// than [`MAX_IDEA_CHARS`], or the backend failure.
    pub async fn submit_idea(&self, text: &str) -> Result<IdeaId> {
        let user_id = self.require_user()?;
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::validation("Please enter your business idea."));
        }
        if text.chars().count() > MAX_IDEA_CHARS {
            return Err(CoreError::validation(format!(
                "Business idea must be at most {MAX_IDEA_CHARS} characters."
            )));
        }

        let created = self
            .api
            .submit_idea(&IdeaSubmission::new(user_id, text))
            .await?;
        self.store.set(keys::IDEA_ID, created.id.as_str())?;
        info!(idea_id = %created.id, "submitted idea");
        Ok(created.id)
    }

    /// Dashboard data of the active idea
    ///
    /// # Errors
    ///
    /// Validation error without a stored user or idea id, or the backend failure.
    pub async fn overview(&self) -> Result<IdeaOverview> {
        let (Some(user_id), Some(idea_id)) = (self.user_id()?, self.idea_id()?) else {
            return Err(CoreError::validation(
                "User ID or Idea ID not found. Please log in again.",
            ));
        };
        let record = self.api.fetch_idea(&user_id, &idea_id).await?;
        Ok(IdeaOverview::from_record(record))
    }

    /// Forget user, idea, draft and versions
    ///
    /// # Errors
    ///
    /// Returns a store failure.
    pub fn logout(&self) -> Result<()> {
        for key in keys::SESSION {
            self.store.remove(key)?;
        }
        info!("logged out");
        Ok(())
    }

    fn require_user(&self) -> Result<UserId> {
        self.user_id()?
            .ok_or_else(|| CoreError::validation("User not logged in."))
    }
}
