//! Canvas sections
//!
//! The nine sections of a Business Model Canvas, with the three names each
//! one goes by:
//! - the draft key used for locally stored drafts (camelCase)
//! - the wire key used in backend payloads (snake_case)
//! - the numbered title shown on the canvas grid

use std::fmt;
use std::str::FromStr;

/// One section of the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CanvasField {
    /// Key partnerships
    KeyPartners,
    /// Key activities
    KeyActivities,
    /// Key resources
    KeyResources,
    /// Value propositions (free text or list)
    ValuePropositions,
    /// Customer relationships
    CustomerRelationships,
    /// Channels
    Channels,
    /// Customer segments
    CustomerSegments,
    /// Cost structure
    CostStructure,
    /// Revenue streams
    RevenueStreams,
}

impl CanvasField {
    /// All sections, in draft order
    pub const ALL: [CanvasField; 9] = [
        CanvasField::KeyPartners,
        CanvasField::KeyActivities,
        CanvasField::KeyResources,
        CanvasField::ValuePropositions,
        CanvasField::CustomerRelationships,
        CanvasField::Channels,
        CanvasField::CustomerSegments,
        CanvasField::CostStructure,
        CanvasField::RevenueStreams,
    ];

    /// Sections in canvas numbering (1 = clients .. 9 = costs)
    pub const CANVAS_ORDER: [CanvasField; 9] = [
        CanvasField::CustomerSegments,
        CanvasField::ValuePropositions,
        CanvasField::Channels,
        CanvasField::CustomerRelationships,
        CanvasField::RevenueStreams,
        CanvasField::KeyActivities,
        CanvasField::KeyResources,
        CanvasField::KeyPartners,
        CanvasField::CostStructure,
    ];

    /// Key used in locally stored drafts
    #[inline]
    #[must_use]
    pub fn draft_key(self) -> &'static str {
        match self {
            Self::KeyPartners => "keyPartners",
            Self::KeyActivities => "keyActivities",
            Self::KeyResources => "keyResources",
            Self::ValuePropositions => "valuePropositions",
            Self::CustomerRelationships => "customerRelationships",
            Self::Channels => "channels",
            Self::CustomerSegments => "customerSegments",
            Self::CostStructure => "costStructure",
            Self::RevenueStreams => "revenueStreams",
        }
    }

    /// Key used when writing to the backend
    #[inline]
    #[must_use]
    pub fn wire_key(self) -> &'static str {
        match self {
            Self::KeyPartners => "key_partnerships",
            Self::KeyActivities => "key_activities",
            Self::KeyResources => "key_resources",
            Self::ValuePropositions => "value_proposition",
            Self::CustomerRelationships => "customer_relationships",
            Self::Channels => "channels",
            Self::CustomerSegments => "customer_segments",
            Self::CostStructure => "cost_structures",
            Self::RevenueStreams => "revenue_streams",
        }
    }

    /// Canvas grid title
    #[inline]
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::CustomerSegments => "CLIENTS",
            Self::ValuePropositions => "VALUE PROPOSITIONS",
            Self::Channels => "CHANNELS",
            Self::CustomerRelationships => "RELATIONSHIP",
            Self::RevenueStreams => "REVENUES",
            Self::KeyActivities => "ACTIVITIES",
            Self::KeyResources => "RESOURCES",
            Self::KeyPartners => "PARTNERS",
            Self::CostStructure => "COSTS",
        }
    }

    /// 1-based position on the canvas grid
    #[must_use]
    pub fn canvas_number(self) -> usize {
        Self::CANVAS_ORDER
            .iter()
            .position(|f| *f == self)
            .map_or(0, |i| i + 1)
    }

    /// Human label derived from the draft key ("keyPartners" -> "Key Partners")
    #[must_use]
    pub fn label(self) -> String {
        let mut out = String::new();
        for (i, ch) in self.draft_key().chars().enumerate() {
            if i == 0 {
                out.extend(ch.to_uppercase());
            } else if ch.is_uppercase() {
                out.push(' ');
                out.push(ch);
            } else {
                out.push(ch);
            }
        }
        out
    }
}

impl fmt::Display for CanvasField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.draft_key())
    }
}

/// Unknown section name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown canvas field: '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for CanvasField {
    type Err = UnknownField;

    /// Accepts draft keys, wire keys, and kebab-case names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        Self::ALL
            .into_iter()
            .find(|field| {
                normalized == field.draft_key().to_lowercase()
                    || normalized == field.wire_key().replace('_', "")
            })
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_numbering_is_one_based() {
        assert_eq!(CanvasField::CustomerSegments.canvas_number(), 1);
        assert_eq!(CanvasField::KeyResources.canvas_number(), 7);
        assert_eq!(CanvasField::CostStructure.canvas_number(), 9);
    }

    #[test]
    fn parse_accepts_all_spellings() {
        assert_eq!(
            "keyPartners".parse::<CanvasField>().unwrap(),
            CanvasField::KeyPartners
        );
        assert_eq!(
            "key_partnerships".parse::<CanvasField>().unwrap(),
            CanvasField::KeyPartners
        );
        assert_eq!(
            "cost-structure".parse::<CanvasField>().unwrap(),
            CanvasField::CostStructure
        );
        assert_eq!(
            "value_proposition".parse::<CanvasField>().unwrap(),
            CanvasField::ValuePropositions
        );
        assert!("mission".parse::<CanvasField>().is_err());
    }

    #[test]
    fn label_splits_camel_case() {
        assert_eq!(CanvasField::CustomerRelationships.label(), "Customer Relationships");
        assert_eq!(CanvasField::Channels.label(), "Channels");
    }
}
