//! HTTP client for the ISMS-P backend.

use async_trait::async_trait;
use ismsp_core::{AnalysisResult, CatalogScope, ComplianceItem, TrendPoint};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::backend::{
    ANALYZE_PATH, Backend, EXPORT_PATH, EvidenceUpload, ITEMS_PATH, STATISTICS_PATH, SAVE_PATH,
    SaveAck, SaveRequest, ensure_pdf,
};
use crate::{ClientConfig, SyncError};

/// reqwest-backed [`Backend`].
pub struct IsmsClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl IsmsClient {
    pub fn new(config: ClientConfig) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ismsp/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Turn non-2xx responses into [`SyncError::Server`].
    async fn check(&self, resp: reqwest::Response) -> Result<reqwest::Response, SyncError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(SyncError::Server {
            status: status.as_u16(),
            body: truncate(body, self.config.max_error_body_bytes),
        })
    }

    async fn json<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, SyncError> {
        let resp = self.check(resp).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Backend for IsmsClient {
    async fn list_items(&self, scope: CatalogScope) -> Result<Vec<ComplianceItem>, SyncError> {
        let url = self.config.url(ITEMS_PATH);
        info!(url = %url, scope = %scope, "fetching checklist items");
        let resp = self
            .client
            .get(&url)
            .query(&scope.query_pairs())
            .send()
            .await?;
        let items: Vec<ComplianceItem> = self.json(resp).await?;
        info!(count = items.len(), "fetched checklist items");
        Ok(items)
    }

    async fn list_trend(&self) -> Result<Vec<TrendPoint>, SyncError> {
        let url = self.config.url(STATISTICS_PATH);
        info!(url = %url, "fetching completion trend");
        let resp = self.client.get(&url).send().await?;
        let points: Vec<TrendPoint> = self.json(resp).await?;
        info!(count = points.len(), "fetched completion trend");
        Ok(points)
    }

    async fn save_item(&self, request: &SaveRequest) -> Result<SaveAck, SyncError> {
        let url = self.config.url(SAVE_PATH);
        info!(url = %url, id = %request.id, scope = %request.scope(), "saving item");
        let resp = self.client.post(&url).json(request).send().await?;
        let resp = self.check(resp).await?;
        // The ack body carries nothing we act on; tolerate non-JSON bodies.
        let bytes = resp.bytes().await?;
        let ack = serde_json::from_slice(&bytes).unwrap_or_default();
        info!(id = %request.id, "item saved");
        Ok(ack)
    }

    async fn analyze_evidence(&self, upload: EvidenceUpload) -> Result<AnalysisResult, SyncError> {
        let url = self.config.url(ANALYZE_PATH);
        info!(url = %url, filename = %upload.filename, size = upload.bytes.len(), "uploading evidence for analysis");
        let mime = upload.mime_type();
        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.filename)
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let resp = self.client.post(&url).multipart(form).send().await?;
        let result: AnalysisResult = self.json(resp).await?;
        info!(
            filename = %result.filename,
            recommended = result.recommended_item.as_deref().unwrap_or("-"),
            "evidence analyzed"
        );
        Ok(result)
    }

    async fn export_pdf(&self, scope: CatalogScope) -> Result<Vec<u8>, SyncError> {
        let url = self.config.url(EXPORT_PATH);
        info!(url = %url, scope = %scope, "exporting report");
        let resp = self
            .client
            .get(&url)
            .query(&scope.query_pairs())
            .send()
            .await?;
        let resp = self.check(resp).await?;
        let bytes = resp.bytes().await?.to_vec();
        ensure_pdf(&bytes)?;
        info!(size = bytes.len(), "report exported");
        Ok(bytes)
    }
}

/// Cut `body` to at most `max` bytes on a char boundary.
fn truncate(mut body: String, max: usize) -> String {
    if body.len() <= max {
        return body;
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body.truncate(end);
    body.push('…');
    body
}
