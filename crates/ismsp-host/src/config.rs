use ismsp_ai::AnalysisRetention;
use ismsp_core::{CatalogScope, Denominator, Period};

/// Whether the backend keeps one catalog per period or a single global one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScopeMode {
    #[default]
    PeriodScoped,
    Global,
}

#[derive(Debug, Clone, Default)]
pub struct WorkbenchConfig {
    pub scope_mode: ScopeMode,
    /// `None` picks the mode's default: live catalog length for period-scoped
    /// catalogs, the fixed control count for a global one.
    pub denominator: Option<Denominator>,
    pub retention: AnalysisRetention,
}

impl WorkbenchConfig {
    pub fn denominator(&self) -> Denominator {
        self.denominator.unwrap_or(match self.scope_mode {
            ScopeMode::PeriodScoped => Denominator::Catalog,
            ScopeMode::Global => Denominator::default(),
        })
    }

    pub fn scope_for(&self, period: Period) -> CatalogScope {
        match self.scope_mode {
            ScopeMode::PeriodScoped => CatalogScope::Period(period),
            ScopeMode::Global => CatalogScope::Global,
        }
    }
}
