//! Trend aggregate cache: completion percentage per historical period.
//!
//! Independent of the active filter. It is refetched alongside every
//! catalog refresh, but always covers all periods.

use ismsp_core::{Period, TrendPoint};
use tracing::{info, warn};

use crate::mirror::{ApplyOutcome, FetchTicket, Mirror};

pub type TrendTicket = FetchTicket<()>;

#[derive(Debug, Default)]
pub struct TrendCache {
    mirror: Mirror<(), TrendPoint>,
}

impl TrendCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_refresh(&mut self) -> TrendTicket {
        self.mirror.begin(())
    }

    pub fn apply(&mut self, ticket: TrendTicket, points: Vec<TrendPoint>) -> ApplyOutcome {
        let epoch = ticket.epoch();
        let outcome = self.mirror.replace(ticket, points);
        match outcome {
            ApplyOutcome::Applied { count } => info!(epoch, count, "trend refreshed"),
            _ => info!(epoch, "discarding superseded trend response"),
        }
        outcome
    }

    pub fn abandon(&mut self, ticket: &TrendTicket) -> ApplyOutcome {
        let outcome = self.mirror.abandon(ticket);
        if outcome == ApplyOutcome::Failed {
            warn!(epoch = ticket.epoch(), "trend refresh failed, keeping previous contents");
        }
        outcome
    }

    pub fn points(&self) -> &[TrendPoint] {
        self.mirror.contents()
    }

    /// Point for a specific period, if the statistics service reported one.
    pub fn point_for(&self, period: &Period) -> Option<&TrendPoint> {
        self.points()
            .iter()
            .find(|p| p.period().as_ref() == Some(period))
    }

    pub fn is_loaded(&self) -> bool {
        self.mirror.is_fresh_for(&())
    }
}
