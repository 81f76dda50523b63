//! Completion ratio over a catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;
use crate::record::ComplianceItem;

/// Number of controls in the ISMS-P checklist.
pub const TOTAL_CONTROLS: u32 = 102;

/// What the written count is divided by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Denominator {
    /// Length of the live catalog.
    Catalog,
    /// A fixed control count, normally [`TOTAL_CONTROLS`].
    Fixed(u32),
}

impl Default for Denominator {
    fn default() -> Self {
        Self::Fixed(TOTAL_CONTROLS)
    }
}

impl FromStr for Denominator {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "catalog" => Ok(Self::Catalog),
            "fixed" => Ok(Self::Fixed(TOTAL_CONTROLS)),
            other => other
                .parse::<u32>()
                .map(Self::Fixed)
                .map_err(|_| CoreError::UnknownDenominator(s.to_string())),
        }
    }
}

/// Written count, total, and rounded percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    pub written: usize,
    pub total: usize,
    pub percent: u8,
}

impl ProgressSummary {
    pub fn of(items: &[ComplianceItem], denominator: Denominator) -> Self {
        let written = written_count(items);
        let total = match denominator {
            Denominator::Catalog => items.len(),
            Denominator::Fixed(n) => n as usize,
        };
        Self {
            written,
            total,
            percent: ratio(written, total),
        }
    }
}

impl fmt::Display for ProgressSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} 완료 ({}%)", self.written, self.total, self.percent)
    }
}

/// Items whose effective status is written.
pub fn written_count(items: &[ComplianceItem]) -> usize {
    items
        .iter()
        .filter(|item| item.effective_status().is_written())
        .count()
}

/// `round(100 * written / total)`, 0 when there is nothing to divide by.
pub fn completion_ratio(items: &[ComplianceItem], denominator: Denominator) -> u8 {
    ProgressSummary::of(items, denominator).percent
}

fn ratio(written: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // A fixed denominator can be smaller than a catalog that grew past it.
    let pct = (100.0 * written as f64 / total as f64).round();
    pct.clamp(0.0, 100.0) as u8
}
