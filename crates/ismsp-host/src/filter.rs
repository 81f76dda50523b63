//! Filter context: the active (year, round).
//!
//! Every pair from the configured sets is valid; whether the backend has data
//! for it is the backend's business, and an empty catalog is a normal result.

use ismsp_core::{Period, Round, Year};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Changed { from: Period, to: Period },
}

impl Transition {
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterContext {
    period: Period,
}

impl FilterContext {
    pub fn new(period: Period) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn select(&mut self, to: Period) -> Transition {
        let from = self.period;
        if from == to {
            return Transition::Unchanged;
        }
        self.period = to;
        Transition::Changed { from, to }
    }

    pub fn select_year(&mut self, year: Year) -> Transition {
        self.select(Period::new(year, self.period.round))
    }

    pub fn select_round(&mut self, round: Round) -> Transition {
        self.select(Period::new(self.period.year, round))
    }
}
