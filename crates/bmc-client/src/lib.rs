//! BMC Client
//!
//! Typed access to the Business Model Canvas backend.
//!
//! # Core Concepts
//!
//! - [`IdeaApi`] / [`UserApi`]: Backend contract consumed by the rest of the workspace
//! - [`HttpBackend`]: reqwest implementation of both traits
//! - [`ApiError`]: Validation, backend, network and schema failures
//! - [`ClientConfig`]: Base URL and request timeout
//!
//! # Example
//!
//! ```rust,no_run
//! use bmc_client::{ClientConfig, Credentials, HttpBackend, UserApi};
//!
//! # async fn run() -> Result<(), bmc_client::ApiError> {
//! let backend = HttpBackend::new(&ClientConfig::new())?;
//! let auth = backend
//!     .login(&Credentials {
//!         email: "ana@example.com".into(),
//!         password: "secret".into(),
//!     })
//!     .await?;
//! println!("logged in as {}", auth.user_id);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod api;
mod config;
mod error;
mod http;
mod schema;

// Re-exports
pub use api::{IdeaApi, UserApi};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, Endpoint};
pub use http::HttpBackend;
pub use schema::{
    AuthResponse, BmcBody, BmcEnvelope, Credentials, IdeaCreated, IdeaId, IdeaRecord,
    IdeaSubmission, IdeaSummary, SignupRequest, UserId, VersionHistoryResponse,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
