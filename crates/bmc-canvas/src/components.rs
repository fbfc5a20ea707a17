//! Backend-side canvas content
//!
//! [`CanvasComponents`] is the canvas as the backend stores it: one list per
//! section, with value propositions as either text or a list. Reports that the
//! backend attaches to a canvas ([`ValidationReport`], [`SwotAnalysis`]) live
//! here too.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::CanvasField;
use crate::lenient;
use crate::text::join_with_newline;

/// Value propositions: a single text block or a list of entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueProposition {
    /// Free text, kept verbatim
    Text(String),
    /// List of entries
    List(Vec<String>),
}

impl ValueProposition {
    /// Editable text form (lists are joined one entry per line)
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::List(items) => join_with_newline(items),
        }
    }

    /// Entries for display (text is a single entry unless empty)
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        match self {
            Self::Text(text) if text.is_empty() => Vec::new(),
            Self::Text(text) => vec![text.clone()],
            Self::List(items) => items.clone(),
        }
    }

    /// True when there is nothing to show
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }
}

impl Default for ValueProposition {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// Canvas sections as stored by the backend
///
/// Every list is read leniently: absent or malformed sections are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasComponents {
    #[serde(default, deserialize_with = "lenient::list")]
    pub key_partnerships: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub key_activities: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub key_resources: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_or_list")]
    pub value_proposition: ValueProposition,
    #[serde(default, deserialize_with = "lenient::list")]
    pub customer_relationships: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub channels: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub customer_segments: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub cost_structure: Vec<String>,
    /// Spelling used by version-history writes
    #[serde(default, deserialize_with = "lenient::list")]
    pub cost_structures: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub revenue_streams: Vec<String>,
}

impl CanvasComponents {
    /// Cost entries under whichever spelling is populated
    #[must_use]
    pub fn costs(&self) -> &[String] {
        if self.cost_structure.is_empty() {
            &self.cost_structures
        } else {
            &self.cost_structure
        }
    }

    /// Entries of one section
    #[must_use]
    pub fn entries(&self, field: CanvasField) -> Vec<String> {
        match field {
            CanvasField::KeyPartners => self.key_partnerships.clone(),
            CanvasField::KeyActivities => self.key_activities.clone(),
            CanvasField::KeyResources => self.key_resources.clone(),
            CanvasField::ValuePropositions => self.value_proposition.entries(),
            CanvasField::CustomerRelationships => self.customer_relationships.clone(),
            CanvasField::Channels => self.channels.clone(),
            CanvasField::CustomerSegments => self.customer_segments.clone(),
            CanvasField::CostStructure => self.costs().to_vec(),
            CanvasField::RevenueStreams => self.revenue_streams.clone(),
        }
    }

    /// True when no section has content
    #[must_use]
    pub fn is_empty(&self) -> bool {
        CanvasField::ALL.iter().all(|f| self.entries(*f).is_empty())
    }
}

/// Feasibility report attached to a canvas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    #[serde(default)]
    pub overall_feasibility_score: Option<f64>,
    #[serde(default)]
    pub segment_scores: BTreeMap<String, f64>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub suggestions: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub risks: Vec<String>,
}

/// SWOT analysis attached to a canvas
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwotAnalysis {
    #[serde(default, deserialize_with = "lenient::list")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub weaknesses: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub opportunities: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub threats: Vec<String>,
}

impl SwotAnalysis {
    /// Total number of entries across the four quadrants
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.strengths.len() + self.weaknesses.len() + self.opportunities.len() + self.threats.len()
    }

    /// True when every quadrant is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
