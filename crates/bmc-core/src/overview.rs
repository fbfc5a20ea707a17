//! Dashboard view of one idea

use bmc_canvas::{CanvasComponents, CanvasField, SwotAnalysis, ValidationReport};
use bmc_client::{IdeaRecord, IdeaSummary};

/// Maximum characters of an idea-card title before truncation
pub const CARD_TITLE_LIMIT: usize = 90;

/// Everything the dashboard shows for an idea
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdeaOverview {
    pub idea: String,
    pub business_idea: String,
    pub components: CanvasComponents,
    pub validation_report: Option<ValidationReport>,
    pub swot: Option<SwotAnalysis>,
}

impl IdeaOverview {
    /// Build the overview from a fetched idea
    #[must_use]
    pub fn from_record(record: IdeaRecord) -> Self {
        let body = record.bmc.and_then(|envelope| envelope.bmc).unwrap_or_default();
        Self {
            idea: record.idea.unwrap_or_default(),
            business_idea: record.businessidea.unwrap_or_default(),
            components: body.bmc_components,
            validation_report: body.validation_report,
            swot: body.swot_analysis,
        }
    }

    /// Sections in canvas numbering with their entries
    #[must_use]
    pub fn sections(&self) -> Vec<(CanvasField, Vec<String>)> {
        CanvasField::CANVAS_ORDER
            .iter()
            .map(|field| (*field, self.components.entries(*field)))
            .collect()
    }
}

/// Title of an idea card, truncated to [`CARD_TITLE_LIMIT`] characters
#[must_use]
pub fn card_title(summary: &IdeaSummary) -> String {
    let title = summary.title();
    if title.chars().count() > CARD_TITLE_LIMIT {
        let head: String = title.chars().take(CARD_TITLE_LIMIT).collect();
        format!("{head}...")
    } else {
        title.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmc_test_utils::idea_record;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn overview_collects_reports() {
        let overview = IdeaOverview::from_record(idea_record(None));

        assert_eq!(overview.idea, "Coffee from cargo bikes");
        assert_eq!(overview.business_idea, "Mobile coffee");
        let report = overview.validation_report.unwrap();
        assert_eq!(report.overall_feasibility_score, Some(7.5));
        assert_eq!(report.segment_scores.get("Commuters"), Some(&8.0));
        assert_eq!(overview.swot.unwrap().threats, vec!["Chains"]);
    }

    #[test]
    fn sections_follow_canvas_numbering() {
        let overview = IdeaOverview::from_record(idea_record(None));
        let sections = overview.sections();

        assert_eq!(sections.len(), 9);
        assert_eq!(sections[0].0, CanvasField::CustomerSegments);
        assert_eq!(sections[0].1, vec!["Commuters"]);
        assert_eq!(sections[8].0, CanvasField::CostStructure);
        assert_eq!(sections[8].1, vec!["Beans", "Repairs"]);
    }

    #[test]
    fn idea_without_canvas_is_empty() {
        let overview = IdeaOverview::from_record(IdeaRecord::default());
        assert!(overview.components.is_empty());
        assert_eq!(overview.validation_report, None);
    }

    #[test]
    fn long_titles_are_truncated() {
        let long: IdeaSummary =
            serde_json::from_value(json!({ "_id": "i1", "businessidea": "x".repeat(120) })).unwrap();
        let title = card_title(&long);
        assert_eq!(title.chars().count(), CARD_TITLE_LIMIT + 3);
        assert!(title.ends_with("..."));

        let short: IdeaSummary =
            serde_json::from_value(json!({ "_id": "i2", "idea": "Tea" })).unwrap();
        assert_eq!(card_title(&short), "Tea");
    }
}
