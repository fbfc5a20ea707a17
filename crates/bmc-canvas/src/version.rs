//! Version identifiers and chain linkage
//!
//! Version identifiers follow the convention `v<N>_<suffix>`. They are parsed
//! once into a [`VersionDescriptor`] so that computing the next sequence number
//! is an integer increment.
//!
//! # Identifier assignment
//!
//! Historically the client discarded the computed sequence number and gave a
//! new snapshot the same identifier as its parent. [`VersionIdPolicy`] keeps
//! that behaviour available (`ReuseParent`) next to one that mints a distinct
//! identifier (`Mint`).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::draft::BmcVersion;

/// Malformed version identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionIdError {
    /// Identifier does not start with `v`
    #[error("version id '{0}' does not start with 'v'")]
    MissingPrefix(String),

    /// No digits between `v` and `_`
    #[error("version id '{0}' has no sequence number")]
    MissingSequence(String),

    /// No `_` after the sequence number
    #[error("version id '{0}' has no '_' separator")]
    MissingSeparator(String),

    /// Sequence number does not fit in 64 bits
    #[error("version id '{0}' has an out-of-range sequence number")]
    SequenceOverflow(String),
}

/// Structured form of a `v<N>_<suffix>` identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionDescriptor {
    /// Sequence number `N`
    pub sequence: u64,
    /// Everything after the first `_` (may be empty)
    pub suffix: String,
}

impl VersionDescriptor {
    /// Create descriptor
    #[inline]
    #[must_use]
    pub fn new(sequence: u64, suffix: impl Into<String>) -> Self {
        Self {
            sequence,
            suffix: suffix.into(),
        }
    }

    /// Sequence number of the version that follows this one
    #[inline]
    #[must_use]
    pub fn next_sequence(&self) -> u64 {
        self.sequence.saturating_add(1)
    }
}

impl FromStr for VersionDescriptor {
    type Err = VersionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix('v')
            .ok_or_else(|| VersionIdError::MissingPrefix(s.to_string()))?;

        let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits_len == 0 {
            return Err(VersionIdError::MissingSequence(s.to_string()));
        }

        let (digits, tail) = rest.split_at(digits_len);
        let suffix = tail
            .strip_prefix('_')
            .ok_or_else(|| VersionIdError::MissingSeparator(s.to_string()))?;

        let sequence = digits
            .parse::<u64>()
            .map_err(|_| VersionIdError::SequenceOverflow(s.to_string()))?;

        Ok(Self::new(sequence, suffix))
    }
}

impl fmt::Display for VersionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}_{}", self.sequence, self.suffix)
    }
}

/// Linkage for the next snapshot in the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextVersion {
    /// Intended sequence number of the new snapshot
    pub sequence: u64,
    /// Identifier of the most recent snapshot, when it parsed
    pub parent_version_id: Option<String>,
}

impl NextVersion {
    /// Linkage for the first snapshot of a chain
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self {
            sequence: 1,
            parent_version_id: None,
        }
    }
}

/// Derive the next linkage from a most-recent-first version list
///
/// Only the first entry is inspected. An empty list, a missing identifier, or
/// an identifier that is not `v<digits>_...` yields the root linkage.
#[must_use]
pub fn compute_next_version(versions: &[BmcVersion]) -> NextVersion {
    let Some(latest) = versions.first() else {
        return NextVersion::root();
    };

    let Some(latest_id) = latest.version_id.as_deref() else {
        return NextVersion::root();
    };

    match latest_id.parse::<VersionDescriptor>() {
        Ok(descriptor) => NextVersion {
            sequence: descriptor.next_sequence(),
            parent_version_id: Some(latest_id.to_string()),
        },
        Err(_) => NextVersion::root(),
    }
}

/// How a new snapshot gets its own `version_id`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionIdPolicy {
    /// New snapshot reuses its parent's identifier (none for a root)
    #[default]
    ReuseParent,
    /// New snapshot gets `v{next}_{YYYYMMDDhhmmss}`
    Mint,
}

impl VersionIdPolicy {
    /// Identifier for a snapshot created at `now` with the given linkage
    #[must_use]
    pub fn assign(self, next: &NextVersion, now: DateTime<Utc>) -> Option<String> {
        match self {
            Self::ReuseParent => next.parent_version_id.clone(),
            Self::Mint => Some(
                VersionDescriptor::new(next.sequence, now.format("%Y%m%d%H%M%S").to_string())
                    .to_string(),
            ),
        }
    }
}

impl FromStr for VersionIdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reuse-parent" | "reuse_parent" | "legacy" => Ok(Self::ReuseParent),
            "mint" => Ok(Self::Mint),
            other => Err(format!(
                "unknown version id policy '{other}' (expected 'reuse-parent' or 'mint')"
            )),
        }
    }
}

impl fmt::Display for VersionIdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ReuseParent => "reuse-parent",
            Self::Mint => "mint",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::BmcDraft;
    use chrono::TimeZone;

    fn version(id: Option<&str>) -> BmcVersion {
        BmcVersion::new(BmcDraft::empty(), "").with_version_id(id.map(str::to_string))
    }

    #[test]
    fn descriptor_parses_sequence_and_suffix() {
        let d: VersionDescriptor = "v3_abc".parse().unwrap();
        assert_eq!(d, VersionDescriptor::new(3, "abc"));
        assert_eq!(d.next_sequence(), 4);
        assert_eq!(d.to_string(), "v3_abc");
    }

    #[test]
    fn descriptor_allows_empty_suffix() {
        let d: VersionDescriptor = "v12_".parse().unwrap();
        assert_eq!(d.sequence, 12);
        assert!(d.suffix.is_empty());
    }

    #[test]
    fn descriptor_rejects_malformed_ids() {
        assert!(matches!(
            "3_abc".parse::<VersionDescriptor>(),
            Err(VersionIdError::MissingPrefix(_))
        ));
        assert!(matches!(
            "v_abc".parse::<VersionDescriptor>(),
            Err(VersionIdError::MissingSequence(_))
        ));
        assert!(matches!(
            "v3abc".parse::<VersionDescriptor>(),
            Err(VersionIdError::MissingSeparator(_))
        ));
        assert!(matches!(
            "v99999999999999999999999_x".parse::<VersionDescriptor>(),
            Err(VersionIdError::SequenceOverflow(_))
        ));
    }

    #[test]
    fn empty_list_yields_root() {
        assert_eq!(compute_next_version(&[]), NextVersion::root());
    }

    #[test]
    fn latest_entry_drives_linkage() {
        let versions = vec![version(Some("v3_abc")), version(Some("v2_old"))];
        let next = compute_next_version(&versions);
        assert_eq!(next.sequence, 4);
        assert_eq!(next.parent_version_id.as_deref(), Some("v3_abc"));
    }

    #[test]
    fn unparseable_latest_yields_root() {
        assert_eq!(
            compute_next_version(&[version(Some("draft-7"))]),
            NextVersion::root()
        );
        assert_eq!(compute_next_version(&[version(None)]), NextVersion::root());
    }

    #[test]
    fn reuse_parent_repeats_parent_id() {
        let next = compute_next_version(&[version(Some("v3_abc"))]);
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(
            VersionIdPolicy::ReuseParent.assign(&next, now).as_deref(),
            Some("v3_abc")
        );
        assert_eq!(VersionIdPolicy::ReuseParent.assign(&NextVersion::root(), now), None);
    }

    #[test]
    fn mint_assigns_next_sequence() {
        let next = compute_next_version(&[version(Some("v3_abc"))]);
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(
            VersionIdPolicy::Mint.assign(&next, now).as_deref(),
            Some("v4_20240501123000")
        );
        assert_eq!(
            VersionIdPolicy::Mint.assign(&NextVersion::root(), now).as_deref(),
            Some("v1_20240501123000")
        );
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!("mint".parse::<VersionIdPolicy>(), Ok(VersionIdPolicy::Mint));
        assert_eq!(
            "reuse-parent".parse::<VersionIdPolicy>(),
            Ok(VersionIdPolicy::ReuseParent)
        );
        assert!("random".parse::<VersionIdPolicy>().is_err());
    }
}
