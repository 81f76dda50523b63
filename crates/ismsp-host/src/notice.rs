//! Transient, dismissible operator notifications.
//!
//! Every failure the workbench recovers from lands here instead of aborting:
//! the operator sees it, dismisses it, and retries by hand.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Catalog or trend fetch failed; stale-or-empty data is shown.
    LoadFailure,
    /// Commit rejected; the draft is still open.
    SaveFailure,
    /// Evidence upload failed; the pending analysis is unchanged.
    UploadFailure,
    Saved,
    Analyzed,
}

impl NoticeKind {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::LoadFailure | Self::SaveFailure | Self::UploadFailure
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoadFailure => "load-failure",
            Self::SaveFailure => "save-failure",
            Self::UploadFailure => "upload-failure",
            Self::Saved => "saved",
            Self::Analyzed => "analyzed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct Notices {
    items: Vec<Notice>,
}

impl Notices {
    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.items.push(Notice {
            kind,
            message: message.into(),
            at: Utc::now(),
        });
    }

    pub fn all(&self) -> &[Notice] {
        &self.items
    }

    /// Remove one notice. Out-of-range indices are ignored.
    pub fn dismiss(&mut self, index: usize) -> Option<Notice> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismiss_and_drain() {
        let mut notices = Notices::default();
        notices.push(NoticeKind::Saved, "저장되었습니다.");
        notices.push(NoticeKind::LoadFailure, "데이터 로드 실패");
        assert!(notices.all()[1].kind.is_failure());

        assert!(notices.dismiss(5).is_none());
        let removed = notices.dismiss(1).unwrap();
        assert_eq!(removed.kind, NoticeKind::LoadFailure);
        assert!(!notices.all()[0].kind.is_failure());

        assert_eq!(notices.drain().len(), 1);
        assert!(notices.all().is_empty());
    }
}
