//! Item catalog cache: mirror of the backend checklist for one scope.
//!
//! Replaced wholesale on every applied refresh. A failed or superseded
//! refresh never touches the contents. After a save, or when the filter
//! moves, the cache is marked stale until the next refresh lands, and
//! callers must not start edits against it in that state.

use std::collections::HashSet;

use ismsp_core::{CatalogScope, ComplianceItem, Denominator, ProgressSummary, control_sort_key};
use tracing::{info, warn};

use crate::StoreError;
use crate::mirror::{ApplyOutcome, FetchTicket, Mirror};

pub type CatalogTicket = FetchTicket<CatalogScope>;

#[derive(Debug, Default)]
pub struct CatalogCache {
    mirror: Mirror<CatalogScope, ComplianceItem>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a refresh for `scope`. Supersedes any refresh still in flight.
    pub fn begin_refresh(&mut self, scope: CatalogScope) -> CatalogTicket {
        if self.mirror.in_flight() {
            info!("superseding catalog refresh still in flight");
        }
        let ticket = self.mirror.begin(scope);
        info!(epoch = ticket.epoch(), scope = %scope, "catalog refresh started");
        ticket
    }

    /// Apply a successful response.
    ///
    /// Rejects responses that repeat a control id; the previous contents
    /// stay in place in that case.
    pub fn apply(
        &mut self,
        ticket: CatalogTicket,
        items: Vec<ComplianceItem>,
    ) -> Result<ApplyOutcome, StoreError> {
        if !self.mirror.is_latest(&ticket) {
            info!(epoch = ticket.epoch(), scope = %ticket.key(), "discarding superseded catalog response");
            return Ok(ApplyOutcome::Stale);
        }

        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                self.mirror.abandon(&ticket);
                return Err(StoreError::DuplicateId {
                    id: item.id.clone(),
                    scope: ticket.key().to_string(),
                });
            }
        }

        let epoch = ticket.epoch();
        let outcome = self.mirror.replace(ticket, items);
        if let ApplyOutcome::Applied { count } = outcome {
            info!(epoch, count, "catalog refreshed");
        }
        Ok(outcome)
    }

    /// Record that the refresh behind `ticket` failed.
    pub fn abandon(&mut self, ticket: &CatalogTicket) -> ApplyOutcome {
        let outcome = self.mirror.abandon(ticket);
        if outcome == ApplyOutcome::Failed {
            warn!(epoch = ticket.epoch(), scope = %ticket.key(), "catalog refresh failed, keeping previous contents");
        }
        outcome
    }

    /// Mark the contents as out of date (after a save or a filter change).
    pub fn invalidate(&mut self) {
        self.mirror.mark_stale();
    }

    /// True when the contents were fetched for `scope` and nothing has
    /// invalidated them since.
    pub fn is_fresh_for(&self, scope: &CatalogScope) -> bool {
        self.mirror.is_fresh_for(scope)
    }

    pub fn is_stale(&self) -> bool {
        self.mirror.is_stale()
    }

    pub fn in_flight(&self) -> bool {
        self.mirror.in_flight()
    }

    /// Scope the current contents were fetched for.
    pub fn scope(&self) -> Option<&CatalogScope> {
        self.mirror.key()
    }

    /// Items in backend order.
    pub fn items(&self) -> &[ComplianceItem] {
        self.mirror.contents()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ComplianceItem> {
        let id = id.trim();
        self.items().iter().find(|item| item.id == id)
    }

    /// Items in checklist order (`2.9.1` before `2.10.1`).
    pub fn sorted(&self) -> Vec<&ComplianceItem> {
        let mut items: Vec<&ComplianceItem> = self.items().iter().collect();
        items.sort_by_cached_key(|item| control_sort_key(&item.id));
        items
    }

    /// Items not yet written, in checklist order.
    pub fn pending(&self) -> Vec<&ComplianceItem> {
        self.sorted()
            .into_iter()
            .filter(|item| !item.effective_status().is_written())
            .collect()
    }

    pub fn progress(&self, denominator: Denominator) -> ProgressSummary {
        ProgressSummary::of(self.items(), denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ismsp_core::{ItemStatus, Period, Round, TextField, Year};

    fn item(id: &str, status: ItemStatus) -> ComplianceItem {
        ComplianceItem {
            id: id.into(),
            main_cat: String::new(),
            sub_cat: String::new(),
            item_name: format!("control {id}"),
            content: String::new(),
            description: TextField::Unset,
            evidence_name: TextField::Unset,
            status: Some(status),
            year: None,
            round_name: None,
        }
    }

    fn scope(round: Round) -> CatalogScope {
        CatalogScope::Period(Period::new(Year::new(2025).unwrap(), round))
    }

    #[test]
    fn superseded_filter_result_never_lands() {
        let mut cache = CatalogCache::new();
        let initial = cache.begin_refresh(scope(Round::Initial));
        let follow_up = cache.begin_refresh(scope(Round::FollowUp1));

        let applied = cache
            .apply(follow_up, vec![item("1.1.1", ItemStatus::Written)])
            .unwrap();
        assert_eq!(applied, ApplyOutcome::Applied { count: 1 });

        let late = cache
            .apply(
                initial,
                vec![
                    item("1.1.1", ItemStatus::Pending),
                    item("1.1.2", ItemStatus::Pending),
                ],
            )
            .unwrap();
        assert_eq!(late, ApplyOutcome::Stale);
        assert_eq!(cache.items().len(), 1);
        assert_eq!(cache.scope(), Some(&scope(Round::FollowUp1)));
        assert!(cache.is_fresh_for(&scope(Round::FollowUp1)));
    }

    #[test]
    fn failure_keeps_previous_contents() {
        let mut cache = CatalogCache::new();
        let t = cache.begin_refresh(CatalogScope::Global);
        cache.apply(t, vec![item("1.1.1", ItemStatus::Written)]).unwrap();

        let t = cache.begin_refresh(CatalogScope::Global);
        assert!(cache.in_flight());
        assert_eq!(cache.abandon(&t), ApplyOutcome::Failed);
        assert!(!cache.in_flight());
        assert_eq!(cache.items().len(), 1);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut cache = CatalogCache::new();
        let t = cache.begin_refresh(CatalogScope::Global);
        cache.apply(t, vec![item("1.1.1", ItemStatus::Written)]).unwrap();

        let t = cache.begin_refresh(CatalogScope::Global);
        let err = cache
            .apply(
                t,
                vec![
                    item("1.1.1", ItemStatus::Pending),
                    item("1.1.1", ItemStatus::Pending),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { ref id, .. } if id == "1.1.1"));
        assert!(!cache.in_flight());
        assert_eq!(cache.items()[0].status, Some(ItemStatus::Written));
    }

    #[test]
    fn invalidate_until_next_apply() {
        let mut cache = CatalogCache::new();
        assert!(!cache.is_fresh_for(&CatalogScope::Global));
        let t = cache.begin_refresh(CatalogScope::Global);
        cache.apply(t, vec![]).unwrap();
        assert!(cache.is_fresh_for(&CatalogScope::Global));
        assert!(cache.is_empty());

        cache.invalidate();
        assert!(cache.is_stale());
        assert!(!cache.is_fresh_for(&CatalogScope::Global));

        let t = cache.begin_refresh(CatalogScope::Global);
        cache.apply(t, vec![]).unwrap();
        assert!(cache.is_fresh_for(&CatalogScope::Global));
    }

    #[test]
    fn sorted_and_pending_follow_checklist_order() {
        let mut cache = CatalogCache::new();
        let t = cache.begin_refresh(CatalogScope::Global);
        cache
            .apply(
                t,
                vec![
                    item("2.10.1", ItemStatus::Pending),
                    item("2.9.1", ItemStatus::Written),
                    item("1.1.1", ItemStatus::Pending),
                ],
            )
            .unwrap();
        let ids: Vec<&str> = cache.sorted().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["1.1.1", "2.9.1", "2.10.1"]);
        let pending: Vec<&str> = cache.pending().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(pending, ["1.1.1", "2.10.1"]);
        assert_eq!(cache.progress(Denominator::Catalog).percent, 33);
        assert!(cache.get(" 2.9.1 ").is_some());
    }
}
