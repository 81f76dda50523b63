//! Edit-session reconciliation.
//!
//! Merges a catalog item, the pending analysis (if any) and the draft
//! template into the initial editable draft. Operator-authored text always
//! wins over synthesized text: a description that is already written is
//! returned verbatim, and the template only fills a description that is unset.
//!
//! Evidence-name priority, first non-empty wins:
//!
//! 1. the pending analysis filename
//! 2. the item's own `evidence_name`
//! 3. empty

use ismsp_core::{AnalysisResult, ComplianceItem, Period};

use crate::draft::{DraftContext, synthesize_description};

/// Where a draft field's initial value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrigin {
    /// Text already stored on the item.
    Existing,
    /// Generated from the draft template.
    Synthesized,
    /// Filename of the pending analysis result.
    Analysis,
    /// Nothing to fill in.
    Empty,
}

impl FieldOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Existing => "existing",
            Self::Synthesized => "synthesized",
            Self::Analysis => "analysis",
            Self::Empty => "empty",
        }
    }
}

/// Mutable in-progress edit of one item.
#[derive(Debug, Clone)]
pub struct EditSessionDraft {
    target: ComplianceItem,
    period: Option<Period>,
    pub description: String,
    pub evidence_name: String,
    description_origin: FieldOrigin,
    evidence_origin: FieldOrigin,
    recommended_item: Option<String>,
    initial: (String, String),
}

impl EditSessionDraft {
    /// The item being edited, as it was when the session opened.
    pub fn target(&self) -> &ComplianceItem {
        &self.target
    }

    pub fn period(&self) -> Option<Period> {
        self.period
    }

    pub fn description_origin(&self) -> FieldOrigin {
        self.description_origin
    }

    pub fn evidence_origin(&self) -> FieldOrigin {
        self.evidence_origin
    }

    /// Control the pending analysis recommended, when it differs from the target.
    pub fn recommendation_mismatch(&self) -> Option<&str> {
        self.recommended_item
            .as_deref()
            .filter(|rec| rec.trim() != self.target.id.trim())
    }

    pub fn set_description(&mut self, text: impl Into<String>) {
        self.description = text.into();
    }

    pub fn set_evidence_name(&mut self, name: impl Into<String>) {
        self.evidence_name = name.into();
    }

    /// True once the operator changed either field from its initial value.
    pub fn is_dirty(&self) -> bool {
        self.description != self.initial.0 || self.evidence_name != self.initial.1
    }
}

/// Resolve the initial evidence name for a session.
pub fn resolve_evidence_name(
    item: &ComplianceItem,
    pending: Option<&AnalysisResult>,
) -> (String, FieldOrigin) {
    if let Some(result) = pending {
        let filename = result.filename.trim();
        if !filename.is_empty() {
            return (filename.to_string(), FieldOrigin::Analysis);
        }
    }
    match item.evidence_name.as_deref() {
        Some(existing) => (existing.to_string(), FieldOrigin::Existing),
        None => (String::new(), FieldOrigin::Empty),
    }
}

/// Build the initial draft for `item`.
///
/// `pending` is only read; clearing the slot is the caller's decision once a
/// commit succeeds. `period` is the active filter when the catalog is
/// period-scoped, and `None` otherwise.
pub fn open_session(
    item: &ComplianceItem,
    pending: Option<&AnalysisResult>,
    period: Option<Period>,
) -> EditSessionDraft {
    let (evidence_name, evidence_origin) = resolve_evidence_name(item, pending);
    let recommended_item = pending.and_then(|r| r.recommended_item.clone());

    let (description, description_origin) = match item.description.as_deref() {
        Some(existing) => (existing.to_string(), FieldOrigin::Existing),
        None => {
            let ctx = DraftContext {
                item_id: &item.id,
                item_name: &item.item_name,
                evidence_name: &evidence_name,
                period,
                recommended_item: recommended_item.as_deref(),
            };
            (synthesize_description(&ctx), FieldOrigin::Synthesized)
        }
    };

    EditSessionDraft {
        target: item.clone(),
        period,
        initial: (description.clone(), evidence_name.clone()),
        description,
        evidence_name,
        description_origin,
        evidence_origin,
        recommended_item,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ismsp_core::{ItemStatus, Round, TextField, Year};

    fn item(description: &str, evidence: &str) -> ComplianceItem {
        ComplianceItem {
            id: "1".into(),
            main_cat: String::new(),
            sub_cat: String::new(),
            item_name: "접근통제 정책".into(),
            content: "접근통제 정책을 수립·이행하여야 한다.".into(),
            description: TextField::from(description),
            evidence_name: TextField::from(evidence),
            status: Some(ItemStatus::Pending),
            year: None,
            round_name: None,
        }
    }

    fn analysis(filename: &str) -> AnalysisResult {
        AnalysisResult {
            filename: filename.into(),
            recommended_item: None,
        }
    }

    #[test]
    fn unwritten_item_with_pending_analysis() {
        let pending = analysis("access_policy.pdf");
        let draft = open_session(&item("-", "-"), Some(&pending), None);
        assert_eq!(draft.evidence_name, "access_policy.pdf");
        assert_eq!(draft.evidence_origin(), FieldOrigin::Analysis);
        assert!(draft.description.contains("접근통제 정책"));
        assert!(draft.description.contains("access_policy.pdf"));
        assert_eq!(draft.description_origin(), FieldOrigin::Synthesized);
        assert!(!draft.is_dirty());
    }

    #[test]
    fn existing_description_is_never_overwritten() {
        let pending = analysis("access_policy.pdf");
        let draft = open_session(&item("기존 작성 내용", "-"), Some(&pending), None);
        assert_eq!(draft.description, "기존 작성 내용");
        assert_eq!(draft.description_origin(), FieldOrigin::Existing);
        // Evidence still follows the analysis.
        assert_eq!(draft.evidence_name, "access_policy.pdf");
    }

    #[test]
    fn analysis_filename_beats_item_evidence() {
        let pending = analysis("new_scan.pdf");
        let draft = open_session(&item("작성됨", "old_scan.pdf"), Some(&pending), None);
        assert_eq!(draft.evidence_name, "new_scan.pdf");
    }

    #[test]
    fn item_evidence_used_without_analysis() {
        let draft = open_session(&item("-", "old_scan.pdf"), None, None);
        assert_eq!(draft.evidence_name, "old_scan.pdf");
        assert_eq!(draft.evidence_origin(), FieldOrigin::Existing);
        assert!(draft.description.contains("old_scan.pdf"));
    }

    #[test]
    fn blank_analysis_filename_falls_through() {
        let pending = analysis("  ");
        let draft = open_session(&item("-", "old_scan.pdf"), Some(&pending), None);
        assert_eq!(draft.evidence_name, "old_scan.pdf");
    }

    #[test]
    fn nothing_to_fill() {
        let draft = open_session(&item("", ""), None, None);
        assert_eq!(draft.evidence_name, "");
        assert_eq!(draft.evidence_origin(), FieldOrigin::Empty);
        assert!(!draft.description.is_empty());
        assert!(draft.description.contains("접근통제 정책"));
    }

    #[test]
    fn blank_and_dash_descriptions_both_synthesize() {
        for sentinel in ["-", "", "   "] {
            let draft = open_session(&item(sentinel, "-"), None, None);
            assert_eq!(draft.description_origin(), FieldOrigin::Synthesized, "{sentinel:?}");
        }
    }

    #[test]
    fn period_is_threaded_into_draft() {
        let period = Period::new(Year::new(2026).unwrap(), Round::Renewal);
        let draft = open_session(&item("-", "-"), None, Some(period));
        assert_eq!(draft.period(), Some(period));
        assert!(draft.description.contains("2026년 갱신심사"));
    }

    #[test]
    fn recommendation_mismatch_is_reported() {
        let pending = AnalysisResult {
            filename: "fw_rules.xlsx".into(),
            recommended_item: Some("2.6.1".into()),
        };
        let draft = open_session(&item("-", "-"), Some(&pending), None);
        assert_eq!(draft.recommendation_mismatch(), Some("2.6.1"));
        assert!(draft.description.contains("2.6.1"));
    }

    #[test]
    fn edits_mark_dirty() {
        let mut draft = open_session(&item("기존 작성 내용", "a.pdf"), None, None);
        draft.set_evidence_name("b.pdf");
        assert!(draft.is_dirty());
        draft.set_evidence_name("a.pdf");
        assert!(!draft.is_dirty());
    }
}
