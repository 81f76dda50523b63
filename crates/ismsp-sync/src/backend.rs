//! Request/response contract of the ISMS-P backend.
//!
//! | Operation        | Request                                      | Response                       |
//! |------------------|----------------------------------------------|--------------------------------|
//! | List items       | `GET /api/isms-items[?year=&round_name=]`    | `[ComplianceItem]`             |
//! | List trend       | `GET /api/statistics`                        | `[TrendPoint]`                 |
//! | Upsert item      | `POST /api/save-item`                        | `{"message": ...}`             |
//! | Analyze evidence | `POST /api/ai/analyze-evidence` (multipart)  | `{filename, recommended_item}` |
//! | Export report    | `GET /api/export-pdf[?year=&round_name=]`    | PDF bytes                      |

use std::path::Path;

use async_trait::async_trait;
use ismsp_core::{
    AnalysisResult, CatalogScope, ComplianceItem, Round, TextField, TrendPoint, Year,
};
use serde::{Deserialize, Serialize};

use crate::SyncError;

pub const ITEMS_PATH: &str = "/api/isms-items";
pub const STATISTICS_PATH: &str = "/api/statistics";
pub const SAVE_PATH: &str = "/api/save-item";
pub const ANALYZE_PATH: &str = "/api/ai/analyze-evidence";
pub const EXPORT_PATH: &str = "/api/export-pdf";

const PDF_MAGIC: &[u8] = b"%PDF";

/// Body of `POST /api/save-item`. Upserts exactly one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Year>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_name: Option<Round>,
    #[serde(default)]
    pub description: TextField,
    #[serde(default)]
    pub evidence_name: TextField,
}

impl SaveRequest {
    /// Period fields are only sent for period-scoped catalogs.
    pub fn new(
        id: impl Into<String>,
        scope: CatalogScope,
        description: &str,
        evidence_name: &str,
    ) -> Self {
        let period = scope.period();
        Self {
            id: id.into(),
            year: period.map(|p| p.year),
            round_name: period.map(|p| p.round),
            description: TextField::from(description),
            evidence_name: TextField::from(evidence_name),
        }
    }

    pub fn scope(&self) -> CatalogScope {
        match (self.year, self.round_name) {
            (Some(year), Some(round)) => CatalogScope::Period(ismsp_core::Period::new(year, round)),
            _ => CatalogScope::Global,
        }
    }
}

/// Acknowledgement of a save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveAck {
    #[serde(default)]
    pub message: Option<String>,
}

/// An evidence file to send for analysis.
#[derive(Debug, Clone)]
pub struct EvidenceUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl EvidenceUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Read a file from disk, naming the upload after its final path component.
    pub async fn from_path(path: &Path) -> Result<Self, SyncError> {
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "evidence".to_string());
        Ok(Self { filename, bytes })
    }

    /// Best-effort content type from the file extension.
    pub fn mime_type(&self) -> &'static str {
        let ext = self
            .filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => "application/pdf",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "txt" | "log" => "text/plain",
            "csv" => "text/csv",
            "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "hwp" => "application/x-hwp",
            _ => "application/octet-stream",
        }
    }
}

/// The backend as seen by the workbench.
///
/// Every call is a single fail-fast round trip; implementations never retry.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_items(&self, scope: CatalogScope) -> Result<Vec<ComplianceItem>, SyncError>;

    async fn list_trend(&self) -> Result<Vec<TrendPoint>, SyncError>;

    async fn save_item(&self, request: &SaveRequest) -> Result<SaveAck, SyncError>;

    async fn analyze_evidence(&self, upload: EvidenceUpload) -> Result<AnalysisResult, SyncError>;

    async fn export_pdf(&self, scope: CatalogScope) -> Result<Vec<u8>, SyncError>;
}

/// Reject export responses that are not PDF documents.
pub fn ensure_pdf(bytes: &[u8]) -> Result<(), SyncError> {
    if bytes.starts_with(PDF_MAGIC) {
        return Ok(());
    }
    let prefix = String::from_utf8_lossy(&bytes[..bytes.len().min(16)]).into_owned();
    Err(SyncError::InvalidPdf { prefix })
}

/// Default file name for an exported report.
pub fn report_file_name(scope: CatalogScope) -> String {
    match scope.period() {
        Some(p) => format!("ISMS_Report_{}_{}.pdf", p.year, p.round.as_str().replace(' ', "_")),
        None => "ISMS_Report.pdf".to_string(),
    }
}
