//! Shared record types exchanged with the ISMS-P backend.

use serde::{Deserialize, Deserializer, Serialize};

use crate::field::TextField;
use crate::period::{Period, Round, Year};

/// Backend label for a row whose description and evidence were saved.
pub const WRITTEN_LABEL: &str = "작성완료";
/// Backend label for a row with nothing saved yet.
pub const PENDING_LABEL: &str = "미작성";

/// Display state of a checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemStatus {
    Written,
    Pending,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Written => WRITTEN_LABEL,
            Self::Pending => PENDING_LABEL,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written)
    }
}

impl From<String> for ItemStatus {
    /// Only the exact written label counts; anything else the backend sends
    /// (`미작성`, `미완료`, ...) is pending.
    fn from(label: String) -> Self {
        if label.trim() == WRITTEN_LABEL {
            Self::Written
        } else {
            Self::Pending
        }
    }
}

impl From<ItemStatus> for String {
    fn from(status: ItemStatus) -> Self {
        status.as_str().to_string()
    }
}

/// One ISMS-P control as returned by `GET /api/isms-items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceItem {
    /// Dotted control number, e.g. `"2.5.1"`. Stable across periods.
    #[serde(deserialize_with = "control_id")]
    pub id: String,
    #[serde(default)]
    pub main_cat: String,
    #[serde(default)]
    pub sub_cat: String,
    pub item_name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: TextField,
    #[serde(default)]
    pub evidence_name: TextField,
    /// Status as reported by the backend. `None` only when the backend
    /// omitted the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Year>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_name: Option<Round>,
}

impl ComplianceItem {
    /// Status used for display and progress.
    ///
    /// The backend's `status` is authoritative. Recomputing from the raw
    /// fields is only a fallback for rows that arrive without one.
    pub fn effective_status(&self) -> ItemStatus {
        self.status.unwrap_or_else(|| self.derived_status())
    }

    /// Client-side recomputation: written when both fields are set.
    pub fn derived_status(&self) -> ItemStatus {
        if self.description.is_set() && self.evidence_name.is_set() {
            ItemStatus::Written
        } else {
            ItemStatus::Pending
        }
    }

    /// Period this row's content applies to, when the backend scopes rows.
    pub fn period(&self) -> Option<Period> {
        Some(Period::new(self.year?, self.round_name?))
    }
}

/// One historical completion percentage from `GET /api/statistics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    #[serde(deserialize_with = "percent")]
    pub percent: f64,
}

impl TrendPoint {
    /// Period named by the label, if it is one this client knows.
    pub fn period(&self) -> Option<Period> {
        Period::from_label(&self.label)
    }
}

/// Result of `POST /api/ai/analyze-evidence`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub filename: String,
    /// Control id the analysis service thinks the evidence belongs to.
    #[serde(default, deserialize_with = "optional_control_id")]
    pub recommended_item: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Unsigned(n) => n.to_string(),
            Self::Signed(n) => n.to_string(),
        }
    }
}

/// Accept both `"1.1.1"` and bare numeric ids.
fn control_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(RawId::deserialize(d)?.into_string())
}

fn optional_control_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(d)?
        .map(RawId::into_string)
        .filter(|s| !s.is_empty()))
}

fn percent<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let raw = f64::deserialize(d)?;
    if raw.is_nan() {
        return Ok(0.0);
    }
    Ok(raw.clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_json() -> &'static str {
        r#"{
            "id": "2.5.1",
            "main_cat": "2. 보호대책 요구사항",
            "sub_cat": "2.5. 인증 및 권한관리",
            "item_name": "사용자 계정 관리",
            "content": "정보시스템과 개인정보 및 중요정보에 대한 비인가 접근을 통제하고...",
            "status": "미작성",
            "description": "-",
            "evidence_name": "-"
        }"#
    }

    #[test]
    fn decodes_backend_row() {
        let item: ComplianceItem = serde_json::from_str(item_json()).unwrap();
        assert_eq!(item.id, "2.5.1");
        assert_eq!(item.description, TextField::Unset);
        assert_eq!(item.evidence_name, TextField::Unset);
        assert_eq!(item.status, Some(ItemStatus::Pending));
        assert_eq!(item.period(), None);
    }

    #[test]
    fn numeric_id_is_normalised() {
        let item: ComplianceItem =
            serde_json::from_str(r#"{"id": 1, "item_name": "접근통제 정책"}"#).unwrap();
        assert_eq!(item.id, "1");
        assert_eq!(item.status, None);
        assert_eq!(item.description, TextField::Unset);
    }

    #[test]
    fn backend_status_wins_over_fields() {
        let mut item: ComplianceItem = serde_json::from_str(item_json()).unwrap();
        item.description = "작성함".into();
        item.evidence_name = "a.pdf".into();
        // Backend still says pending; that is what we show.
        assert_eq!(item.effective_status(), ItemStatus::Pending);
        item.status = None;
        assert_eq!(item.effective_status(), ItemStatus::Written);
    }

    #[test]
    fn derived_status_needs_both_fields() {
        let mut item: ComplianceItem = serde_json::from_str(item_json()).unwrap();
        item.status = None;
        item.description = "작성함".into();
        assert_eq!(item.effective_status(), ItemStatus::Pending);
    }

    #[test]
    fn any_other_label_is_pending() {
        assert_eq!(ItemStatus::from("미완료".to_string()), ItemStatus::Pending);
        assert_eq!(ItemStatus::from("작성완료".to_string()), ItemStatus::Written);
    }

    #[test]
    fn scoped_row_carries_period() {
        let item: ComplianceItem = serde_json::from_str(
            r#"{"id": "1.1.1", "item_name": "x", "year": "2026", "round_name": "갱신심사"}"#,
        )
        .unwrap();
        assert_eq!(item.period().unwrap().label(), "2026 갱신심사");
    }

    #[test]
    fn numeric_year_does_not_break_the_row() {
        let items: Vec<ComplianceItem> = serde_json::from_str(
            r#"[{"id": "1.1.1", "item_name": "x", "year": 2025, "round_name": "최초"},
                {"id": "1.1.2", "item_name": "y", "year": "2025", "round_name": "최초"}]"#,
        )
        .unwrap();
        assert_eq!(items[0].period(), items[1].period());
        assert_eq!(items[0].period(), Some(Period::default()));
    }

    #[test]
    fn trend_percent_is_clamped() {
        let points: Vec<TrendPoint> = serde_json::from_str(
            r#"[{"label": "2025 최초", "percent": 37.3}, {"label": "2024 최초", "percent": 120}]"#,
        )
        .unwrap();
        assert_eq!(points[0].percent, 37.3);
        assert_eq!(points[1].percent, 100.0);
        assert!(points[0].period().is_some());
    }

    #[test]
    fn analysis_result_tolerates_null_recommendation() {
        let result: AnalysisResult =
            serde_json::from_str(r#"{"filename": "a.pdf", "recommended_item": null}"#).unwrap();
        assert_eq!(result.recommended_item, None);
        let result: AnalysisResult =
            serde_json::from_str(r#"{"filename": "a.pdf", "recommended_item": "2.6.1"}"#).unwrap();
        assert_eq!(result.recommended_item.as_deref(), Some("2.6.1"));
    }
}
