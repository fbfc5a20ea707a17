//! Editable canvas drafts and locally held versions
//!
//! A [`BmcDraft`] holds one text block per section, the form the user edits.
//! A [`BmcVersion`] is a draft plus the identity of the snapshot it came from;
//! it is the element type of the locally held version list.

use serde::{Deserialize, Serialize};

use crate::components::CanvasComponents;
use crate::field::CanvasField;
use crate::record::BmcData;
use crate::text::{join_with_newline, split_to_list};

/// Editable canvas: one newline-delimited text block per section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmcDraft {
    #[serde(default)]
    pub key_partners: String,
    #[serde(default)]
    pub key_activities: String,
    #[serde(default)]
    pub key_resources: String,
    #[serde(default)]
    pub value_propositions: String,
    #[serde(default)]
    pub customer_relationships: String,
    #[serde(default)]
    pub channels: String,
    #[serde(default)]
    pub customer_segments: String,
    #[serde(default)]
    pub cost_structure: String,
    #[serde(default)]
    pub revenue_streams: String,
}

impl BmcDraft {
    /// Create an all-empty draft
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Editable form of backend components
    #[must_use]
    pub fn from_components(components: &CanvasComponents) -> Self {
        Self {
            key_partners: join_with_newline(&components.key_partnerships),
            key_activities: join_with_newline(&components.key_activities),
            key_resources: join_with_newline(&components.key_resources),
            value_propositions: components.value_proposition.to_text(),
            customer_relationships: join_with_newline(&components.customer_relationships),
            channels: join_with_newline(&components.channels),
            customer_segments: join_with_newline(&components.customer_segments),
            cost_structure: join_with_newline(components.costs()),
            revenue_streams: join_with_newline(&components.revenue_streams),
        }
    }

    /// Backend form of this draft
    ///
    /// List sections are split on line breaks with empty lines dropped; value
    /// propositions are sent verbatim.
    #[must_use]
    pub fn to_bmc_data(&self) -> BmcData {
        BmcData {
            key_partnerships: split_to_list(&self.key_partners),
            key_activities: split_to_list(&self.key_activities),
            key_resources: split_to_list(&self.key_resources),
            value_proposition: self.value_propositions.clone(),
            customer_relationships: split_to_list(&self.customer_relationships),
            channels: split_to_list(&self.channels),
            customer_segments: split_to_list(&self.customer_segments),
            cost_structures: split_to_list(&self.cost_structure),
            revenue_streams: split_to_list(&self.revenue_streams),
        }
    }

    /// Text of one section
    #[must_use]
    pub fn field(&self, field: CanvasField) -> &str {
        match field {
            CanvasField::KeyPartners => &self.key_partners,
            CanvasField::KeyActivities => &self.key_activities,
            CanvasField::KeyResources => &self.key_resources,
            CanvasField::ValuePropositions => &self.value_propositions,
            CanvasField::CustomerRelationships => &self.customer_relationships,
            CanvasField::Channels => &self.channels,
            CanvasField::CustomerSegments => &self.customer_segments,
            CanvasField::CostStructure => &self.cost_structure,
            CanvasField::RevenueStreams => &self.revenue_streams,
        }
    }

    /// Mutable text of one section
    pub fn field_mut(&mut self, field: CanvasField) -> &mut String {
        match field {
            CanvasField::KeyPartners => &mut self.key_partners,
            CanvasField::KeyActivities => &mut self.key_activities,
            CanvasField::KeyResources => &mut self.key_resources,
            CanvasField::ValuePropositions => &mut self.value_propositions,
            CanvasField::CustomerRelationships => &mut self.customer_relationships,
            CanvasField::Channels => &mut self.channels,
            CanvasField::CustomerSegments => &mut self.customer_segments,
            CanvasField::CostStructure => &mut self.cost_structure,
            CanvasField::RevenueStreams => &mut self.revenue_streams,
        }
    }

    /// Replace the text of one section
    #[inline]
    #[must_use]
    pub fn with_field(mut self, field: CanvasField, text: impl Into<String>) -> Self {
        *self.field_mut(field) = text.into();
        self
    }

    /// True when every section is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        CanvasField::ALL.iter().all(|f| self.field(*f).is_empty())
    }
}

/// One entry of the local version list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BmcVersion {
    #[serde(flatten)]
    pub draft: BmcDraft,
    /// Display date (local time)
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_version_id: Option<String>,
}

impl BmcVersion {
    /// Create a version entry from a draft
    #[inline]
    #[must_use]
    pub fn new(draft: BmcDraft, date: impl Into<String>) -> Self {
        Self {
            draft,
            date: date.into(),
            version_id: None,
            parent_version_id: None,
        }
    }

    /// With version identifier
    #[inline]
    #[must_use]
    pub fn with_version_id(mut self, version_id: Option<String>) -> Self {
        self.version_id = version_id;
        self
    }

    /// With parent identifier
    #[inline]
    #[must_use]
    pub fn with_parent(mut self, parent_version_id: Option<String>) -> Self {
        self.parent_version_id = parent_version_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ValueProposition;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn draft_uses_camel_case_keys() {
        let draft = BmcDraft::empty().with_field(CanvasField::KeyPartners, "A\nB");
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["keyPartners"], json!("A\nB"));
        assert_eq!(value["costStructure"], json!(""));
    }

    #[test]
    fn draft_reads_older_payloads_without_key_resources() {
        let draft: BmcDraft = serde_json::from_value(json!({
            "keyPartners": "A",
            "valuePropositions": "V"
        }))
        .unwrap();
        assert_eq!(draft.key_partners, "A");
        assert_eq!(draft.key_resources, "");
    }

    #[test]
    fn components_round_trip_through_draft() {
        let components = CanvasComponents {
            key_partnerships: vec!["Supplier".into(), "Bank".into()],
            value_proposition: ValueProposition::List(vec!["Cheap".into(), "Fast".into()]),
            cost_structures: vec!["Rent".into()],
            ..CanvasComponents::default()
        };

        let draft = BmcDraft::from_components(&components);
        assert_eq!(draft.key_partners, "Supplier\nBank");
        assert_eq!(draft.value_propositions, "Cheap\nFast");
        assert_eq!(draft.cost_structure, "Rent");

        let data = draft.to_bmc_data();
        assert_eq!(data.key_partnerships, vec!["Supplier", "Bank"]);
        assert_eq!(data.value_proposition, "Cheap\nFast");
        assert_eq!(data.cost_structures, vec!["Rent"]);
    }

    #[test]
    fn version_flattens_draft_fields() {
        let version = BmcVersion::new(BmcDraft::empty(), "2024-01-01 10:00:00")
            .with_version_id(Some("v1_a".into()));
        let value = serde_json::to_value(&version).unwrap();
        assert_eq!(value["version_id"], json!("v1_a"));
        assert_eq!(value["keyPartners"], json!(""));
        assert!(value.get("parent_version_id").is_none());
    }
}
