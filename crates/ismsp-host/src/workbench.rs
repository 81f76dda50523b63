//! The compliance workbench: one operator, one backend, one open edit at a time.
//!
//! Owns the filter context, both caches, the pending analysis slot, and the
//! edit session. All backend traffic goes through the [`Backend`] seam so the
//! same lifecycle runs against HTTP or an in-memory double.

use ismsp_ai::{EditSessionDraft, PendingAnalysis};
use ismsp_core::{
    AnalysisResult, CatalogScope, ComplianceItem, Period, ProgressSummary, Round, TrendPoint, Year,
};
use ismsp_store::{ApplyOutcome, CatalogCache, CatalogTicket, TrendCache, TrendTicket};
use ismsp_sync::{Backend, EvidenceUpload, SaveAck, SaveRequest, SyncError, report_file_name};
use tracing::{info, warn};

use crate::config::WorkbenchConfig;
use crate::error::HostError;
use crate::filter::{FilterContext, Transition};
use crate::notice::{Notice, NoticeKind, Notices};

/// Tickets for one catalog + trend refresh pair.
#[derive(Debug, Clone)]
pub struct RefreshTickets {
    pub catalog: CatalogTicket,
    pub trend: TrendTicket,
}

impl RefreshTickets {
    pub fn scope(&self) -> CatalogScope {
        *self.catalog.key()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    pub catalog: ApplyOutcome,
    pub trend: ApplyOutcome,
}

impl RefreshReport {
    pub fn failed(&self) -> bool {
        self.catalog == ApplyOutcome::Failed || self.trend == ApplyOutcome::Failed
    }
}

#[derive(Debug, Clone)]
pub struct CommitReport {
    pub ack: SaveAck,
    pub refresh: RefreshReport,
}

#[derive(Debug, Clone)]
pub struct ExportedReport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct Workbench<B> {
    backend: B,
    config: WorkbenchConfig,
    filter: FilterContext,
    catalog: CatalogCache,
    trend: TrendCache,
    pending: PendingAnalysis,
    session: Option<EditSessionDraft>,
    notices: Notices,
}

impl<B: Backend> Workbench<B> {
    pub fn new(backend: B, config: WorkbenchConfig, period: Period) -> Self {
        Self {
            backend,
            config,
            filter: FilterContext::new(period),
            catalog: CatalogCache::new(),
            trend: TrendCache::new(),
            pending: PendingAnalysis::new(),
            session: None,
            notices: Notices::default(),
        }
    }

    pub fn config(&self) -> &WorkbenchConfig {
        &self.config
    }

    pub fn period(&self) -> Period {
        self.filter.period()
    }

    /// Scope the next catalog fetch will use.
    pub fn scope(&self) -> CatalogScope {
        self.config.scope_for(self.filter.period())
    }

    pub fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }

    pub fn trend(&self) -> &TrendCache {
        &self.trend
    }

    pub fn pending_analysis(&self) -> Option<&AnalysisResult> {
        self.pending.peek()
    }

    pub fn progress(&self) -> ProgressSummary {
        self.catalog.progress(self.config.denominator())
    }

    // -- Filter --

    /// Move the filter. A real change invalidates the catalog; the caller
    /// follows up with [`Workbench::refresh`].
    pub fn select_period(&mut self, period: Period) -> Transition {
        let transition = self.filter.select(period);
        self.on_transition(transition);
        transition
    }

    pub fn select_year(&mut self, year: Year) -> Transition {
        let transition = self.filter.select_year(year);
        self.on_transition(transition);
        transition
    }

    pub fn select_round(&mut self, round: Round) -> Transition {
        let transition = self.filter.select_round(round);
        self.on_transition(transition);
        transition
    }

    fn on_transition(&mut self, transition: Transition) {
        if let Transition::Changed { from, to } = transition {
            info!(from = %from, to = %to, "filter changed");
            self.catalog.invalidate();
        }
    }

    /// Select a period and refetch when it actually changed.
    pub async fn set_period(&mut self, period: Period) -> Option<RefreshReport> {
        match self.select_period(period) {
            Transition::Unchanged => None,
            Transition::Changed { .. } => Some(self.refresh().await),
        }
    }

    // -- Refresh --

    /// Issue tickets for a catalog + trend refresh at the current scope.
    ///
    /// Any refresh still in flight is superseded: its response will be
    /// discarded when it arrives.
    pub fn begin_refresh(&mut self) -> RefreshTickets {
        RefreshTickets {
            catalog: self.catalog.begin_refresh(self.scope()),
            trend: self.trend.begin_refresh(),
        }
    }

    /// Fetch both halves of a refresh concurrently. Does not touch the caches.
    pub async fn fetch(
        &self,
        tickets: &RefreshTickets,
    ) -> (
        Result<Vec<ComplianceItem>, SyncError>,
        Result<Vec<TrendPoint>, SyncError>,
    ) {
        futures::join!(
            self.backend.list_items(tickets.scope()),
            self.backend.list_trend()
        )
    }

    /// Apply the responses for `tickets`. Failures become notices.
    pub fn complete_refresh(
        &mut self,
        tickets: RefreshTickets,
        items: Result<Vec<ComplianceItem>, SyncError>,
        points: Result<Vec<TrendPoint>, SyncError>,
    ) -> RefreshReport {
        let scope = tickets.scope();

        let catalog = match items {
            Ok(items) => match self.catalog.apply(tickets.catalog, items) {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(scope = %scope, error = %e, "rejecting catalog response");
                    self.notices.push(NoticeKind::LoadFailure, e.to_string());
                    ApplyOutcome::Failed
                }
            },
            Err(e) => {
                let outcome = self.catalog.abandon(&tickets.catalog);
                if outcome == ApplyOutcome::Failed {
                    self.notices
                        .push(NoticeKind::LoadFailure, HostError::Load(e).to_string());
                }
                outcome
            }
        };

        let trend = match points {
            Ok(points) => self.trend.apply(tickets.trend, points),
            Err(e) => {
                let outcome = self.trend.abandon(&tickets.trend);
                if outcome == ApplyOutcome::Failed {
                    self.notices
                        .push(NoticeKind::LoadFailure, format!("failed to load trend: {e}"));
                }
                outcome
            }
        };

        RefreshReport { catalog, trend }
    }

    pub async fn refresh(&mut self) -> RefreshReport {
        let tickets = self.begin_refresh();
        let (items, points) = self.fetch(&tickets).await;
        self.complete_refresh(tickets, items, points)
    }

    // -- Edit session --

    pub fn session(&self) -> Option<&EditSessionDraft> {
        self.session.as_ref()
    }

    /// Open an edit session for `id` against the current catalog.
    ///
    /// Refused while another session is open, or while the catalog is stale
    /// or was fetched for a different scope.
    pub fn open_session(&mut self, id: &str) -> Result<&mut EditSessionDraft, HostError> {
        if let Some(open) = &self.session {
            return Err(HostError::SessionAlreadyOpen {
                id: open.target().id.clone(),
            });
        }

        let scope = self.scope();
        if !self.catalog.is_fresh_for(&scope) {
            return Err(HostError::StaleCatalog { scope });
        }

        let item = self
            .catalog
            .get(id)
            .ok_or_else(|| HostError::UnknownItem(id.trim().to_string()))?;
        let draft = ismsp_ai::open_session(item, self.pending.peek(), scope.period());
        info!(
            id = %item.id,
            description = draft.description_origin().as_str(),
            evidence = draft.evidence_origin().as_str(),
            "edit session opened"
        );
        Ok(self.session.insert(draft))
    }

    /// Discard the open session without contacting the backend.
    pub fn cancel(&mut self) -> Option<EditSessionDraft> {
        let draft = self.session.take();
        if let Some(draft) = &draft {
            info!(id = %draft.target().id, "edit session cancelled");
        }
        draft
    }

    /// Save the open session.
    ///
    /// On failure the draft stays open and a notice is raised. On success
    /// the session closes, the pending analysis is settled per the retention
    /// policy, and the catalog is refetched.
    pub async fn commit(&mut self) -> Result<CommitReport, HostError> {
        let draft = self.session.as_ref().ok_or(HostError::NoSession)?;
        let id = draft.target().id.clone();
        let scope = draft
            .period()
            .map_or(CatalogScope::Global, CatalogScope::Period);
        let request = SaveRequest::new(&id, scope, &draft.description, &draft.evidence_name);

        let ack = match self.backend.save_item(&request).await {
            Ok(ack) => ack,
            Err(source) => {
                let err = HostError::Save { id, source };
                warn!(error = %err, "save failed, draft kept open");
                self.notices.push(NoticeKind::SaveFailure, err.to_string());
                return Err(err);
            }
        };

        self.session = None;
        self.pending.settle_after_commit(self.config.retention);
        self.catalog.invalidate();
        info!(id = %id, scope = %scope, "item saved");
        self.notices.push(
            NoticeKind::Saved,
            ack.message.clone().unwrap_or_else(|| format!("{id} 저장 완료")),
        );

        let refresh = self.refresh().await;
        Ok(CommitReport { ack, refresh })
    }

    // -- Evidence analysis --

    /// Upload evidence for classification and fill the pending slot.
    ///
    /// A failed upload leaves the slot as it was.
    pub async fn analyze_evidence(
        &mut self,
        upload: EvidenceUpload,
    ) -> Result<AnalysisResult, HostError> {
        let filename = upload.filename.clone();
        match self.backend.analyze_evidence(upload).await {
            Ok(result) => {
                info!(
                    filename = %result.filename,
                    recommended = result.recommended_item.as_deref().unwrap_or("-"),
                    "evidence analyzed"
                );
                let message = match result.recommended_item.as_deref() {
                    Some(rec) => format!("{} 분석 완료: 추천 항목 {rec}", result.filename),
                    None => format!("{} 분석 완료", result.filename),
                };
                self.notices.push(NoticeKind::Analyzed, message);
                self.pending.store(result.clone());
                Ok(result)
            }
            Err(e) => {
                warn!(filename = %filename, error = %e, "evidence upload failed");
                let err = HostError::Upload(e);
                self.notices.push(NoticeKind::UploadFailure, err.to_string());
                Err(err)
            }
        }
    }

    pub fn clear_analysis(&mut self) -> Option<AnalysisResult> {
        self.pending.take()
    }

    // -- Export --

    pub async fn export_report(&self) -> Result<ExportedReport, HostError> {
        let scope = self.scope();
        let bytes = self
            .backend
            .export_pdf(scope)
            .await
            .map_err(HostError::Export)?;
        info!(scope = %scope, bytes = bytes.len(), "report exported");
        Ok(ExportedReport {
            file_name: report_file_name(scope),
            bytes,
        })
    }

    // -- Notices --

    pub fn notices(&self) -> &[Notice] {
        self.notices.all()
    }

    pub fn dismiss(&mut self, index: usize) -> Option<Notice> {
        self.notices.dismiss(index)
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }
}
