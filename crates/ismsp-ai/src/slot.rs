//! The pending analysis slot.
//!
//! Holds the most recent evidence-analysis result until an edit session has
//! used it. There is never more than one: a new upload replaces the old
//! result. Opening a session only reads the slot; emptying it is an explicit
//! step taken after a successful commit, according to [`AnalysisRetention`].

use ismsp_core::AnalysisResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What happens to the pending analysis once a commit succeeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisRetention {
    /// Empty the slot after every successful commit.
    #[default]
    ClearOnCommit,
    /// Keep the result available to later sessions until the next upload.
    RetainAcrossSessions,
}

#[derive(Debug, Default)]
pub struct PendingAnalysis {
    current: Option<AnalysisResult>,
}

impl PendingAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a fresh result in the slot, returning whatever it displaced.
    pub fn store(&mut self, result: AnalysisResult) -> Option<AnalysisResult> {
        debug!(filename = %result.filename, "pending analysis stored");
        self.current.replace(result)
    }

    /// Read the pending result without consuming it.
    pub fn peek(&self) -> Option<&AnalysisResult> {
        self.current.as_ref()
    }

    /// Remove and return the pending result.
    pub fn take(&mut self) -> Option<AnalysisResult> {
        self.current.take()
    }

    pub fn clear(&mut self) {
        if self.current.take().is_some() {
            debug!("pending analysis cleared");
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.current.is_some()
    }

    /// Apply the retention policy after a successful commit.
    pub fn settle_after_commit(&mut self, retention: AnalysisRetention) {
        match retention {
            AnalysisRetention::ClearOnCommit => self.clear(),
            AnalysisRetention::RetainAcrossSessions => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str) -> AnalysisResult {
        AnalysisResult {
            filename: name.into(),
            recommended_item: None,
        }
    }

    #[test]
    fn new_upload_overwrites_previous() {
        let mut slot = PendingAnalysis::new();
        assert!(slot.store(result("a.pdf")).is_none());
        let displaced = slot.store(result("b.pdf"));
        assert_eq!(displaced.unwrap().filename, "a.pdf");
        assert_eq!(slot.peek().unwrap().filename, "b.pdf");
    }

    #[test]
    fn peek_does_not_consume() {
        let mut slot = PendingAnalysis::new();
        slot.store(result("a.pdf"));
        let _ = slot.peek();
        let _ = slot.peek();
        assert!(slot.is_occupied());
        assert_eq!(slot.take().unwrap().filename, "a.pdf");
        assert!(!slot.is_occupied());
    }

    #[test]
    fn retention_policy() {
        let mut slot = PendingAnalysis::new();
        slot.store(result("a.pdf"));
        slot.settle_after_commit(AnalysisRetention::RetainAcrossSessions);
        assert!(slot.is_occupied());
        slot.settle_after_commit(AnalysisRetention::ClearOnCommit);
        assert!(slot.peek().is_none());
    }
}
