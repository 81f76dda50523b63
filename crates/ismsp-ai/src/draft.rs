//! Draft description synthesis for controls with nothing written yet.
//!
//! The draft is a starting point for the operator, not a finished statement:
//! it names the control and the evidence file so the text is concrete, and
//! flags when the analysis service thinks the evidence fits another control.

use ismsp_core::Period;

// ── Templates ──

const PERIOD_PREFIX: &str = "[{period} 심사] ";

const BODY: &str = "「{item_name}」 항목과 관련하여 내부 정책 및 절차를 수립하고, \
이에 따라 담당자를 지정하여 이행·관리하고 있음.";

const EVIDENCE_ATTACHED: &str = " 이행 증적으로 '{evidence}' 자료를 보관하고 있으며, \
정기적으로 검토하여 최신 상태를 유지함.";

const EVIDENCE_MISSING: &str = " 이행 증적 자료는 추후 첨부 예정임.";

const RECOMMENDATION_NOTE: &str = "\n※ AI 분석 결과 해당 증적은 {recommended} 항목에 \
더 적합한 것으로 추천됨. 확인 필요.";

/// Inputs to the draft template.
#[derive(Debug, Clone, Copy)]
pub struct DraftContext<'a> {
    pub item_id: &'a str,
    pub item_name: &'a str,
    /// Resolved evidence label; empty when none resolved.
    pub evidence_name: &'a str,
    /// Active period, when the catalog is period-scoped.
    pub period: Option<Period>,
    /// Control the analysis service recommended, if any.
    pub recommended_item: Option<&'a str>,
}

/// Build a draft description for an unwritten control.
pub fn synthesize_description(ctx: &DraftContext<'_>) -> String {
    let mut out = String::new();

    if let Some(period) = ctx.period {
        out.push_str(&PERIOD_PREFIX.replace("{period}", &period.to_string()));
    }

    out.push_str(&BODY.replace("{item_name}", ctx.item_name.trim()));

    let evidence = ctx.evidence_name.trim();
    if evidence.is_empty() {
        out.push_str(EVIDENCE_MISSING);
    } else {
        out.push_str(&EVIDENCE_ATTACHED.replace("{evidence}", evidence));
    }

    if let Some(recommended) = ctx.recommended_item
        && recommended.trim() != ctx.item_id.trim()
    {
        out.push_str(&RECOMMENDATION_NOTE.replace("{recommended}", recommended.trim()));
    }

    out
}
