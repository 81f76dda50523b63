use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown assessment year: {0} (expected one of 2024, 2025, 2026)")]
    UnknownYear(String),

    #[error("unknown assessment round: {0}")]
    UnknownRound(String),

    #[error("unknown denominator mode: {0} (expected 'fixed' or 'catalog')")]
    UnknownDenominator(String),
}
