//! Plain-text views printed to stdout

use std::fmt;

use bmc_canvas::{BmcDraft, BmcVersion, CanvasField, SwotAnalysis, ValidationReport};
use bmc_client::{IdeaId, IdeaSummary};
use bmc_core::{card_title, IdeaOverview};

/// Nine canvas sections in canvas numbering
pub(crate) struct CanvasView<'a>(pub(crate) &'a IdeaOverview);

impl fmt::Display for CanvasView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, entries) in self.0.sections() {
            writeln!(f, "{}. {}", field.canvas_number(), field.title())?;
            if entries.is_empty() {
                writeln!(f, "   (empty)")?;
            }
            for entry in entries {
                writeln!(f, "   - {entry}")?;
            }
        }
        Ok(())
    }
}

/// Idea text, reports and canvas
pub(crate) struct DashboardView<'a>(pub(crate) &'a IdeaOverview);

impl fmt::Display for DashboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let overview = self.0;
        writeln!(f, "Idea: {}", overview.idea)?;
        if !overview.business_idea.is_empty() && overview.business_idea != overview.idea {
            writeln!(f, "Business idea: {}", overview.business_idea)?;
        }
        writeln!(f)?;

        match &overview.validation_report {
            Some(report) => write_report(f, report)?,
            None => writeln!(f, "Validation report: not available")?,
        }
        writeln!(f)?;

        match &overview.swot {
            Some(swot) if !swot.is_empty() => write_swot(f, swot)?,
            _ => writeln!(f, "SWOT analysis: not available")?,
        }
        writeln!(f)?;

        write!(f, "{}", CanvasView(overview))
    }
}

fn write_report(f: &mut fmt::Formatter<'_>, report: &ValidationReport) -> fmt::Result {
    match report.overall_feasibility_score {
        Some(score) => writeln!(f, "Overall feasibility: {score:.1}")?,
        None => writeln!(f, "Overall feasibility: n/a")?,
    }
    if !report.segment_scores.is_empty() {
        writeln!(f, "Segment scores:")?;
        for (segment, score) in &report.segment_scores {
            writeln!(f, "   {segment}: {score:.1}")?;
        }
    }
    write_list(f, "Suggestions", &report.suggestions)?;
    write_list(f, "Strengths", &report.strengths)?;
    write_list(f, "Risks", &report.risks)
}

fn write_swot(f: &mut fmt::Formatter<'_>, swot: &SwotAnalysis) -> fmt::Result {
    writeln!(f, "SWOT analysis:")?;
    write_list(f, "Strengths", &swot.strengths)?;
    write_list(f, "Weaknesses", &swot.weaknesses)?;
    write_list(f, "Opportunities", &swot.opportunities)?;
    write_list(f, "Threats", &swot.threats)
}

fn write_list(f: &mut fmt::Formatter<'_>, heading: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(f, "{heading}:")?;
    for item in items {
        writeln!(f, "   - {item}")?;
    }
    Ok(())
}

/// Draft sections with their draft keys, for `bmc edit`
pub(crate) struct DraftView<'a>(pub(crate) &'a BmcDraft);

impl fmt::Display for DraftView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in CanvasField::ALL {
            writeln!(f, "{} [{}]", field.label(), field.draft_key())?;
            for line in self.0.field(field).lines() {
                writeln!(f, "   {line}")?;
            }
        }
        Ok(())
    }
}

/// Numbered version list, most recent first
pub(crate) struct VersionsView<'a>(pub(crate) &'a [BmcVersion]);

impl fmt::Display for VersionsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No saved versions.");
        }
        for (index, version) in self.0.iter().enumerate() {
            let id = version.version_id.as_deref().unwrap_or("-");
            write!(f, "[{index}] {id}")?;
            if !version.date.is_empty() {
                write!(f, "  {}", version.date)?;
            }
            if let Some(parent) = &version.parent_version_id {
                write!(f, "  (parent {parent})")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Idea cards; the active idea is starred
pub(crate) struct IdeasView<'a> {
    pub(crate) ideas: &'a [IdeaSummary],
    pub(crate) active: Option<&'a IdeaId>,
}

impl fmt::Display for IdeasView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ideas.is_empty() {
            return writeln!(f, "No ideas yet. Submit one with `bmc submit`.");
        }
        for idea in self.ideas {
            let marker = if Some(&idea.id) == self.active { '*' } else { ' ' };
            writeln!(f, "{marker} {}  {}", idea.id, card_title(idea))?;
        }
        Ok(())
    }
}
