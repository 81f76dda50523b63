//! Terminal rendering for catalog rows, item cards, and progress.
//!
//! Every renderer returns a `String`; `main` decides where it goes.

use std::fmt::Write;

use ismsp_ai::EditSessionDraft;
use ismsp_core::{AnalysisResult, ComplianceItem, ProgressSummary, TextField, TrendPoint};
use ismsp_host::Notice;

const NAME_WIDTH: usize = 28;
const BAR_WIDTH: usize = 30;

/// Truncate to `max` characters, marking the cut.
fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn field(value: &TextField) -> &str {
    value.as_deref().unwrap_or("-")
}

// ── Catalog ──

pub fn items_table(items: &[&ComplianceItem]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<10} {:<6} {:<NAME_WIDTH$} 증적", "ID", "상태", "항목");
    for item in items {
        let _ = writeln!(
            out,
            "{:<10} {:<6} {:<NAME_WIDTH$} {}",
            item.id,
            item.effective_status().as_str(),
            clip(&item.item_name, NAME_WIDTH),
            field(&item.evidence_name),
        );
    }
    let _ = write!(out, "{} items", items.len());
    out
}

/// Print one item as a vertical card.
pub fn item_card(item: &ComplianceItem) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} {} ===", item.id, item.item_name);
    let _ = writeln!(out, "  {:<10} {}", "분류", item.main_cat);
    let _ = writeln!(out, "  {:<10} {}", "세부", item.sub_cat);
    if let Some(period) = item.period() {
        let _ = writeln!(out, "  {:<10} {}", "심사", period);
    }
    let _ = writeln!(out, "  {:<10} {}", "상태", item.effective_status().as_str());
    if !item.content.trim().is_empty() {
        let _ = writeln!(out, "\n인증기준\n  {}", item.content.trim());
    }
    let _ = writeln!(out, "\n운영현황\n  {}", field(&item.description));
    let _ = write!(out, "\n증적\n  {}", field(&item.evidence_name));
    out
}

pub fn progress_line(summary: &ProgressSummary) -> String {
    let filled = usize::from(summary.percent) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {summary}",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled)
    )
}

pub fn trend_table(points: &[TrendPoint]) -> String {
    if points.is_empty() {
        return "no trend data".to_string();
    }
    let mut out = String::new();
    for point in points {
        let filled = (point.percent / 100.0 * BAR_WIDTH as f64).round() as usize;
        let _ = writeln!(
            out,
            "{:<14} {:>5.1}% {}",
            point.label,
            point.percent,
            "#".repeat(filled.min(BAR_WIDTH)),
        );
    }
    out.trim_end().to_string()
}

// ── Edit session ──

pub fn analysis(result: &AnalysisResult) -> String {
    format!(
        "파일: {}\n추천 항목: {}",
        result.filename,
        result.recommended_item.as_deref().unwrap_or("-")
    )
}

pub fn draft(draft: &EditSessionDraft) -> String {
    let target = draft.target();
    let mut out = String::new();
    let _ = writeln!(out, "=== {} {} (편집) ===", target.id, target.item_name);
    if let Some(period) = draft.period() {
        let _ = writeln!(out, "  심사       {period}");
    }
    let _ = writeln!(
        out,
        "  운영현황   [{}]\n{}",
        draft.description_origin().as_str(),
        draft.description
    );
    let _ = write!(
        out,
        "  증적       [{}] {}",
        draft.evidence_origin().as_str(),
        if draft.evidence_name.is_empty() {
            "-"
        } else {
            &draft.evidence_name
        }
    );
    if let Some(rec) = draft.recommendation_mismatch() {
        let _ = write!(out, "\n  ! 분석 결과 추천 항목은 {rec} 입니다");
    }
    out
}

/// Failures are flagged with `!` so they stand out in stderr.
pub fn notice(notice: &Notice) -> String {
    format!(
        "{}[{}] {} {}",
        if notice.kind.is_failure() { "! " } else { "" },
        notice.at.format("%H:%M:%S"),
        notice.kind.as_str(),
        notice.message
    )
}
