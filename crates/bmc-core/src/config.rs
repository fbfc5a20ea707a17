//! Application configuration
//!
//! Load order: defaults, then an optional TOML file, then environment
//! overrides. Command-line flags are applied by the binary afterwards.
//!
//! ```toml
//! state_path = ".bmc-state.json"
//! version_id_policy = "reuse-parent"
//!
//! [api]
//! base_url = "http://localhost:3002"
//! request_timeout_secs = 30
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use bmc_canvas::VersionIdPolicy;
use bmc_client::ClientConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CoreError, Result};

/// Overrides `api.base_url`
pub const ENV_API_URL: &str = "BMC_API_URL";
/// Overrides `state_path`
pub const ENV_STATE_PATH: &str = "BMC_STATE_PATH";
/// Overrides `version_id_policy`
pub const ENV_VERSION_POLICY: &str = "BMC_VERSION_POLICY";

/// Default location of the local state file
pub const DEFAULT_STATE_PATH: &str = ".bmc-state.json";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend client settings
    pub api: ClientConfig,
    /// File holding user, idea, draft and versions between runs
    pub state_path: PathBuf,
    /// How saved versions get their identifier
    pub version_id_policy: VersionIdPolicy,
}

impl AppConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With backend base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    /// With state file location
    #[inline]
    #[must_use]
    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = path.into();
        self
    }

    /// With version id policy
    #[inline]
    #[must_use]
    pub fn with_version_policy(mut self, policy: VersionIdPolicy) -> Self {
        self.version_id_policy = policy;
        self
    }

    /// Parse TOML text; absent keys keep their defaults
    ///
    /// # Errors
    ///
    /// [`CoreError::Config`] for malformed TOML or unknown values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Defaults, overlaid by `path` when given, overlaid by the environment
    ///
    /// # Errors
    ///
    /// [`CoreError::Config`] when the file cannot be read or parsed, or an
    /// environment value is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| env::var(key).ok())
    }

    fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|e| {
                    CoreError::Config(format!("cannot read {}: {e}", path.display()))
                })?;
                debug!(path = %path.display(), "loaded config file");
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        config.with_overrides(lookup)
    }

    /// Apply overrides looked up by environment variable name
    ///
    /// # Errors
    ///
    /// [`CoreError::Config`] for an unknown version id policy.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            info!("{ENV_API_URL} set, using backend {url}");
            self.api.base_url = url;
        }
        if let Some(path) = lookup(ENV_STATE_PATH).filter(|v| !v.trim().is_empty()) {
            info!("{ENV_STATE_PATH} set, using state file {path}");
            self.state_path = PathBuf::from(path);
        }
        if let Some(policy) = lookup(ENV_VERSION_POLICY).filter(|v| !v.trim().is_empty()) {
            self.version_id_policy = policy
                .parse()
                .map_err(|e| CoreError::Config(format!("{ENV_VERSION_POLICY}: {e}")))?;
            info!("{ENV_VERSION_POLICY} set, using {}", self.version_id_policy);
        }
        Ok(self)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ClientConfig::default(),
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            version_id_policy: VersionIdPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = AppConfig::new();
        assert_eq!(config.api.base_url, "http://localhost:3002");
        assert_eq!(config.state_path, PathBuf::from(".bmc-state.json"));
        assert_eq!(config.version_id_policy, VersionIdPolicy::ReuseParent);
    }

    #[test]
    fn toml_overrides_selected_keys() {
        let config = AppConfig::from_toml_str(
            r#"
            version_id_policy = "mint"

            [api]
            request_timeout_secs = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.version_id_policy, VersionIdPolicy::Mint);
        assert_eq!(config.api.request_timeout_secs, Some(10));
        assert_eq!(config.api.base_url, "http://localhost:3002");
    }

    #[test]
    fn malformed_toml_is_config_error() {
        assert!(matches!(
            AppConfig::from_toml_str("version_id_policy = \"sometimes\""),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn environment_wins_over_file() {
        let config = AppConfig::from_toml_str("state_path = \"from-file.json\"")
            .unwrap()
            .with_overrides(env_of(&[
                (ENV_STATE_PATH, "from-env.json"),
                (ENV_API_URL, "https://api.example.com"),
                (ENV_VERSION_POLICY, "mint"),
            ]))
            .unwrap();
        assert_eq!(config.state_path, PathBuf::from("from-env.json"));
        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.version_id_policy, VersionIdPolicy::Mint);
    }

    #[test]
    fn invalid_policy_in_environment_is_rejected() {
        let result = AppConfig::new().with_overrides(env_of(&[(ENV_VERSION_POLICY, "random")]));
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bmc.toml");
        fs::write(
            &path,
            "state_path = \"from-file.json\"\n[api]\nbase_url = \"http://backend:9000\"\n",
        )
        .unwrap();

        let config =
            AppConfig::load_with(Some(&path), env_of(&[(ENV_STATE_PATH, "from-env.json")])).unwrap();
        assert_eq!(config.api.base_url, "http://backend:9000");
        assert_eq!(config.state_path, PathBuf::from("from-env.json"));
        assert!(AppConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
