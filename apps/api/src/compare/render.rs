//! Comparison renderer: projects one diff run sequence into two aligned views.
//!
//! The original view strikes through removals and drops additions; the
//! optimized view highlights additions and drops removals. Both views are
//! projected from the same run slice, so run boundaries always line up.

use serde::Serialize;

use crate::compare::diff::{DiffRun, RunKind};
use crate::models::optimization::{OptimizationResult, ResumeSection, ScoreSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Original,
    Optimized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Removed,
    Added,
}

/// A piece of rendered text, optionally carrying a visual marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedView {
    pub mode: ViewMode,
    pub segments: Vec<Segment>,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionComparison {
    pub title: String,
    pub original: RenderedView,
    pub optimized: RenderedView,
    /// Rationale shown beneath the optimized view, in the order given.
    pub changes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub result_id: String,
    pub scores: ScoreSummary,
    pub analysis: String,
    pub suggested_keywords: Vec<String>,
    pub sections: Vec<SectionComparison>,
}

/// Projects runs into the segments visible in `mode`. Pure and total.
pub fn project(runs: &[DiffRun], mode: ViewMode) -> Vec<Segment> {
    runs.iter()
        .filter_map(|run| {
            let marker = match (mode, run.kind) {
                (_, RunKind::Unchanged) => None,
                (ViewMode::Original, RunKind::Removed) => Some(Marker::Removed),
                (ViewMode::Optimized, RunKind::Added) => Some(Marker::Added),
                // the other side's change is suppressed entirely
                (ViewMode::Original, RunKind::Added) | (ViewMode::Optimized, RunKind::Removed) => {
                    return None
                }
            };
            Some(Segment {
                text: run.text.clone(),
                marker,
            })
        })
        .collect()
}

/// Renders segments as an HTML fragment: `<del>` for removals, `<ins>` for additions.
/// Whitespace is left as-is; the container is expected to use `white-space: pre-wrap`.
pub fn to_html(segments: &[Segment]) -> String {
    let mut html = String::new();
    for segment in segments {
        let text = escape_html(&segment.text);
        match segment.marker {
            None => html.push_str(&text),
            Some(Marker::Removed) => {
                html.push_str("<del class=\"diff-removed\">");
                html.push_str(&text);
                html.push_str("</del>");
            }
            Some(Marker::Added) => {
                html.push_str("<ins class=\"diff-added\">");
                html.push_str(&text);
                html.push_str("</ins>");
            }
        }
    }
    html
}

pub fn render_view(runs: &[DiffRun], mode: ViewMode) -> RenderedView {
    let segments = project(runs, mode);
    let html = to_html(&segments);
    RenderedView {
        mode,
        segments,
        html,
    }
}

/// Renders one section. `runs` must be the diff of the section's own text pair.
pub fn render_section(section: &ResumeSection, runs: &[DiffRun]) -> SectionComparison {
    SectionComparison {
        title: section.title.clone(),
        original: render_view(runs, ViewMode::Original),
        optimized: render_view(runs, ViewMode::Optimized),
        changes: section.changes.clone(),
    }
}

/// Assembles the full report once every section's runs are known, in section order.
pub fn build_report(result: &OptimizationResult, section_runs: &[&[DiffRun]]) -> ComparisonReport {
    let sections = result
        .sections
        .iter()
        .zip(section_runs)
        .map(|(section, runs)| render_section(section, runs))
        .collect();

    ComparisonReport {
        result_id: result.id.clone(),
        scores: result.score_summary(),
        analysis: result.analysis.clone(),
        suggested_keywords: result.suggested_keywords.clone(),
        sections,
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::diff::diff_words;

    fn plain(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    fn marked(segments: &[Segment], marker: Marker) -> String {
        segments
            .iter()
            .filter(|s| s.marker == Some(marker))
            .map(|s| s.text.as_str())
            .collect()
    }

    fn unmarked(segments: &[Segment]) -> String {
        segments
            .iter()
            .filter(|s| s.marker.is_none())
            .map(|s| s.text.as_str())
            .collect()
    }

    #[test]
    fn test_section_comparison_scenario() {
        let original = "Managed a team of 5";
        let optimized = "Led a cross-functional team of 5 engineers";
        let runs = diff_words(original, optimized);

        let left = project(&runs, ViewMode::Original);
        assert_eq!(marked(&left, Marker::Removed), "Managed");
        assert!(unmarked(&left).contains("team of 5"));
        assert!(!plain(&left).contains("Led"));
        assert!(!plain(&left).contains("cross-functional"));
        assert!(!plain(&left).contains("engineers"));
        assert!(left.iter().all(|s| s.marker != Some(Marker::Added)));

        let right = project(&runs, ViewMode::Optimized);
        let added = marked(&right, Marker::Added);
        assert!(added.contains("Led"));
        assert!(added.contains("cross-functional"));
        assert!(added.contains("engineers"));
        assert!(!plain(&right).contains("Managed"));
        assert!(unmarked(&right).contains("team of 5"));
        assert!(right.iter().all(|s| s.marker != Some(Marker::Removed)));
    }

    #[test]
    fn test_views_reconstruct_their_texts() {
        let original = "Wrote  unit tests\nfor the billing service";
        let optimized = "Wrote integration tests\nfor the billing and ledger services";
        let runs = diff_words(original, optimized);
        assert_eq!(plain(&project(&runs, ViewMode::Original)), original);
        assert_eq!(plain(&project(&runs, ViewMode::Optimized)), optimized);
    }

    #[test]
    fn test_views_share_unchanged_runs() {
        let runs = diff_words("Handled customer tickets daily", "Resolved 40 customer tickets daily");
        let left = project(&runs, ViewMode::Original);
        let right = project(&runs, ViewMode::Optimized);
        assert_eq!(unmarked(&left), unmarked(&right));
    }

    #[test]
    fn test_html_markers_and_escaping() {
        let runs = diff_words("C & <b>", "C & Rust");
        let html = render_view(&runs, ViewMode::Optimized).html;
        assert!(html.starts_with("C &amp; "));
        assert!(html.contains("<ins class=\"diff-added\">Rust</ins>"));

        let html = render_view(&runs, ViewMode::Original).html;
        assert!(html.contains("<del class=\"diff-removed\">&lt;b&gt;</del>"));
    }

    #[test]
    fn test_render_section_keeps_changes_in_order() {
        let section = ResumeSection {
            title: "Experience".to_string(),
            original: "Did things".to_string(),
            optimized: "Did things".to_string(),
            changes: vec![
                "Quantified impact".to_string(),
                "Added keywords".to_string(),
                "Quantified impact".to_string(),
            ],
        };
        let runs = diff_words(&section.original, &section.optimized);
        let rendered = render_section(&section, &runs);
        assert_eq!(rendered.title, "Experience");
        assert_eq!(rendered.changes, section.changes);
        assert_eq!(rendered.original.segments, rendered.optimized.segments);
    }

    #[test]
    fn test_empty_runs_render_empty_views() {
        let view = render_view(&[], ViewMode::Original);
        assert!(view.segments.is_empty());
        assert!(view.html.is_empty());
    }
}
