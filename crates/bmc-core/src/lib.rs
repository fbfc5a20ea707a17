//! BMC Core
//!
//! Client-side logic for drafting and versioning a Business Model Canvas.
//!
//! # Core Concepts
//!
//! - [`VersionReconciler`]: Draft plus cached version history; saves new versions
//! - [`Session`]: Login, idea selection and submission
//! - [`KeyValueStore`]: Persistence port for session state
//! - [`IdeaOverview`]: Dashboard data of one idea
//! - [`AppConfig`]: File and environment configuration
//!
//! # Example
//!
//! ```rust,no_run
//! use bmc_canvas::CanvasField;
//! use bmc_client::{ClientConfig, HttpBackend};
//! use bmc_core::{MemoryStore, VersionReconciler};
//!
//! # async fn run() -> bmc_core::Result<()> {
//! let backend = HttpBackend::new(&ClientConfig::new())?;
//! let mut reconciler = VersionReconciler::new(backend, MemoryStore::new());
//! reconciler.refresh().await?;
//! reconciler.set_field(CanvasField::Channels, "Street\nApp");
//! reconciler.save_version().await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod config;
pub mod error;
pub mod overview;
pub mod reconciler;
pub mod session;
pub mod store;

// Re-exports
pub use config::AppConfig;
pub use error::{CoreError, Result, StoreError};
pub use overview::{card_title, IdeaOverview};
pub use reconciler::{display_date, load_history, VersionReconciler};
pub use session::{Session, MAX_IDEA_CHARS};
pub use store::{keys, FileStore, KeyValueStore, KeyValueStoreExt, MemoryStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
