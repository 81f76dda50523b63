//! Epoch-ticketed snapshot shared by the catalog and trend caches.
//!
//! Every refresh takes a [`FetchTicket`] before its request goes out. When
//! the response comes back it is applied only if no newer ticket has been
//! issued since; anything older is discarded. Requests are never cancelled,
//! so this is the only thing keeping a slow response for a previous filter
//! from overwriting the current one.

/// Handle for one in-flight refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket<K> {
    epoch: u64,
    key: K,
}

impl<K> FetchTicket<K> {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn key(&self) -> &K {
        &self.key
    }
}

/// Result of completing a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Contents replaced with `count` rows.
    Applied { count: usize },
    /// A newer refresh was started; the result was dropped.
    Stale,
    /// The latest refresh failed; previous contents kept.
    Failed,
}

#[derive(Debug)]
pub(crate) struct Mirror<K, T> {
    contents: Vec<T>,
    key: Option<K>,
    issued: u64,
    applied: u64,
    /// Epoch of the latest ticket while it has neither applied nor failed.
    pending: Option<u64>,
    stale: bool,
}

impl<K: Clone + PartialEq, T> Default for Mirror<K, T> {
    fn default() -> Self {
        Self {
            contents: Vec::new(),
            key: None,
            issued: 0,
            applied: 0,
            pending: None,
            stale: false,
        }
    }
}

impl<K: Clone + PartialEq, T> Mirror<K, T> {
    pub(crate) fn begin(&mut self, key: K) -> FetchTicket<K> {
        self.issued += 1;
        self.pending = Some(self.issued);
        FetchTicket {
            epoch: self.issued,
            key,
        }
    }

    pub(crate) fn is_latest(&self, ticket: &FetchTicket<K>) -> bool {
        ticket.epoch == self.issued
    }

    pub(crate) fn replace(&mut self, ticket: FetchTicket<K>, contents: Vec<T>) -> ApplyOutcome {
        if !self.is_latest(&ticket) {
            return ApplyOutcome::Stale;
        }
        let count = contents.len();
        self.contents = contents;
        self.key = Some(ticket.key);
        self.applied = ticket.epoch;
        self.pending = None;
        self.stale = false;
        ApplyOutcome::Applied { count }
    }

    pub(crate) fn abandon(&mut self, ticket: &FetchTicket<K>) -> ApplyOutcome {
        if self.is_latest(ticket) {
            self.pending = None;
            ApplyOutcome::Failed
        } else {
            ApplyOutcome::Stale
        }
    }

    pub(crate) fn contents(&self) -> &[T] {
        &self.contents
    }

    pub(crate) fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub(crate) fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Fresh means: something was applied, nothing invalidated it since,
    /// and it was fetched for `key`.
    pub(crate) fn is_fresh_for(&self, key: &K) -> bool {
        !self.stale && self.applied > 0 && self.key.as_ref() == Some(key)
    }

    pub(crate) fn is_stale(&self) -> bool {
        self.stale
    }

    /// True while the latest refresh has not yet applied or failed.
    pub(crate) fn in_flight(&self) -> bool {
        self.pending.is_some()
    }
}
