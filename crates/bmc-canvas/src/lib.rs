//! BMC Canvas
//!
//! Domain model for Business Model Canvas drafting and versioning. No I/O.
//!
//! # Core Concepts
//!
//! - [`CanvasField`]: The nine canvas sections and their names
//! - [`BmcDraft`]: Editable canvas, one newline-delimited text block per section
//! - [`BmcVersion`]: Entry of the locally held version list
//! - [`CanvasComponents`]: Canvas as the backend stores it (lists per section)
//! - [`VersionRecord`] / [`VersionHistoryUpdate`]: Snapshot payload sent to the backend
//! - [`VersionDescriptor`]: Parsed `v<N>_<suffix>` identifier
//!
//! # Example
//!
//! ```rust
//! use bmc_canvas::{compute_next_version, BmcDraft, BmcVersion, CanvasField};
//!
//! let draft = BmcDraft::empty().with_field(CanvasField::KeyPartners, "Supplier\nBank");
//! assert_eq!(draft.to_bmc_data().key_partnerships, vec!["Supplier", "Bank"]);
//!
//! let history = vec![BmcVersion::new(draft, "").with_version_id(Some("v2_x".into()))];
//! let next = compute_next_version(&history);
//! assert_eq!(next.sequence, 3);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod components;
mod draft;
mod field;
mod lenient;
mod record;
mod text;
mod version;

// Re-exports
pub use components::{CanvasComponents, SwotAnalysis, ValidationReport, ValueProposition};
pub use draft::{BmcDraft, BmcVersion};
pub use field::{CanvasField, UnknownField};
pub use record::{BmcData, HistoryEntry, HistoryState, VersionHistoryUpdate, VersionRecord};
pub use text::{join_with_newline, split_to_list};
pub use version::{
    compute_next_version, NextVersion, VersionDescriptor, VersionIdError, VersionIdPolicy,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
