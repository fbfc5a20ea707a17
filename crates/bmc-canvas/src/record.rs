//! Version-history records
//!
//! Outbound: [`VersionRecord`] wrapped in a [`VersionHistoryUpdate`] is what
//! the client PUTs to the version-history endpoint.
//! Inbound: [`HistoryEntry`] is one snapshot of the history the backend
//! returns with an idea.

use serde::{Deserialize, Serialize};

use crate::components::CanvasComponents;
use crate::lenient;

/// Canvas content in backend form, as written by this client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BmcData {
    pub key_partnerships: Vec<String>,
    pub key_activities: Vec<String>,
    pub key_resources: Vec<String>,
    pub value_proposition: String,
    pub customer_relationships: Vec<String>,
    pub channels: Vec<String>,
    pub customer_segments: Vec<String>,
    pub cost_structures: Vec<String>,
    pub revenue_streams: Vec<String>,
}

/// One snapshot submitted to the backend
///
/// Never mutated after creation. `validation_report` and `changes_made` are
/// always empty when created by this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_version_id: Option<String>,
    /// RFC 3339, UTC, millisecond precision
    pub timestamp: String,
    pub bmc_data: BmcData,
    #[serde(default)]
    pub validation_report: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub changes_made: Vec<serde_json::Value>,
}

impl VersionRecord {
    /// Create a record with empty report and change list
    #[inline]
    #[must_use]
    pub fn new(
        version_id: Option<String>,
        parent_version_id: Option<String>,
        timestamp: impl Into<String>,
        bmc_data: BmcData,
    ) -> Self {
        Self {
            version_id,
            parent_version_id,
            timestamp: timestamp.into(),
            bmc_data,
            validation_report: serde_json::Map::new(),
            changes_made: Vec::new(),
        }
    }
}

/// State wrapper of a history update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryState {
    pub version_history: Vec<VersionRecord>,
}

/// Body of `PUT /api/business-ideas/{ideaId}/version-history`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionHistoryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    pub state: HistoryState,
}

impl VersionHistoryUpdate {
    /// Payload adding a single record to the history
    #[must_use]
    pub fn single(record: VersionRecord) -> Self {
        Self {
            version_id: record.version_id.clone(),
            state: HistoryState {
                version_history: vec![record],
            },
        }
    }

    /// The record being added
    #[inline]
    #[must_use]
    pub fn record(&self) -> Option<&VersionRecord> {
        self.state.version_history.first()
    }
}

/// One snapshot of server-held history
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HistoryEntry {
    #[serde(default, deserialize_with = "lenient::id")]
    pub version_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::id")]
    pub parent_version_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub timestamp: Option<String>,
    /// Canvas content; entries written by this client carry it as `bmc_data`
    #[serde(default, alias = "bmc_data", deserialize_with = "lenient::components")]
    pub bmc: CanvasComponents,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_identifiers_are_omitted() {
        let record = VersionRecord::new(None, None, "2024-05-01T10:00:00.000Z", BmcData::default());
        let payload = serde_json::to_value(VersionHistoryUpdate::single(record)).unwrap();

        assert!(payload.get("version_id").is_none());
        let first = &payload["state"]["version_history"][0];
        assert!(first.get("version_id").is_none());
        assert!(first.get("parent_version_id").is_none());
        assert_eq!(first["validation_report"], json!({}));
        assert_eq!(first["changes_made"], json!([]));
    }

    #[test]
    fn history_entry_reads_either_content_key() {
        let a: HistoryEntry = serde_json::from_value(json!({
            "version_id": "v1_a",
            "bmc": { "channels": ["web"] }
        }))
        .unwrap();
        let b: HistoryEntry = serde_json::from_value(json!({
            "version_id": "v1_a",
            "bmc_data": { "channels": ["web"] }
        }))
        .unwrap();
        assert_eq!(a.bmc.channels, b.bmc.channels);
    }

    #[test]
    fn null_content_reads_as_empty_canvas() {
        let entry: HistoryEntry =
            serde_json::from_value(json!({ "version_id": "v1_a", "bmc": null })).unwrap();
        assert!(entry.bmc.is_empty());
    }

    #[test]
    fn non_object_content_and_numeric_ids_are_tolerated() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "version_id": 3,
            "parent_version_id": "v2_b",
            "bmc": "oops"
        }))
        .unwrap();
        assert_eq!(entry.version_id.as_deref(), Some("3"));
        assert_eq!(entry.parent_version_id.as_deref(), Some("v2_b"));
        assert!(entry.bmc.is_empty());
    }

    #[test]
    fn history_entry_without_content_is_empty() {
        let entry: HistoryEntry = serde_json::from_value(json!({ "version_id": "v2_b" })).unwrap();
        assert!(entry.bmc.is_empty());
        assert_eq!(entry.timestamp, None);
    }
}
