//! Assessment periods: the configured year and round value sets.
//!
//! The backend stores `year` and `round_name` as plain strings and matches
//! them exactly, so the labels here must stay byte-identical to what it
//! expects (`"2025"`, `"사후 1차"`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::CoreError;

/// An assessment year from the configured set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct Year(u16);

impl Year {
    pub const ALL: [Year; 3] = [Year(2024), Year(2025), Year(2026)];
    pub const DEFAULT: Year = Year(2025);

    pub fn new(value: u16) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|y| y.0 == value)
            .ok_or_else(|| CoreError::UnknownYear(value.to_string()))
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Year {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('년');
        let value: u16 = trimmed
            .parse()
            .map_err(|_| CoreError::UnknownYear(s.to_string()))?;
        Self::new(value)
    }
}

/// Accepts `"2025"` as well as a bare `2025`.
impl<'de> Deserialize<'de> for Year {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawYear {
            Text(String),
            Number(u64),
        }

        let year = match RawYear::deserialize(d)? {
            RawYear::Text(s) => s.parse(),
            RawYear::Number(n) => u16::try_from(n)
                .map_err(|_| CoreError::UnknownYear(n.to_string()))
                .and_then(Self::new),
        };
        year.map_err(serde::de::Error::custom)
    }
}

impl From<Year> for String {
    fn from(year: Year) -> Self {
        year.to_string()
    }
}

/// An assessment round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Round {
    /// 최초: initial certification audit.
    Initial,
    /// 사후 1차: first follow-up audit.
    FollowUp1,
    /// 사후 2차: second follow-up audit.
    FollowUp2,
    /// 갱신심사: renewal audit.
    Renewal,
}

impl Round {
    pub const ALL: [Round; 4] = [
        Round::Initial,
        Round::FollowUp1,
        Round::FollowUp2,
        Round::Renewal,
    ];
    pub const DEFAULT: Round = Round::Initial;

    /// Backend label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "최초",
            Self::FollowUp1 => "사후 1차",
            Self::FollowUp2 => "사후 2차",
            Self::Renewal => "갱신심사",
        }
    }

    /// ASCII alias accepted on the command line.
    pub fn alias(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::FollowUp1 => "follow-up-1",
            Self::FollowUp2 => "follow-up-2",
            Self::Renewal => "renewal",
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Round {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == trimmed || r.alias().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::UnknownRound(s.to_string()))
    }
}

impl TryFrom<String> for Round {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Round> for String {
    fn from(round: Round) -> Self {
        round.as_str().to_string()
    }
}

/// A (year, round) pair scoping one catalog snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: Year,
    #[serde(rename = "round_name")]
    pub round: Round,
}

impl Default for Period {
    fn default() -> Self {
        Self {
            year: Year::DEFAULT,
            round: Round::DEFAULT,
        }
    }
}

impl Period {
    pub fn new(year: Year, round: Round) -> Self {
        Self { year, round }
    }

    /// Statistics label, e.g. `"2025 사후 1차"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.year, self.round)
    }

    /// Parse a statistics label back into a period.
    ///
    /// Returns `None` for labels outside the configured value sets; the
    /// statistics service may report periods this client was not built for.
    pub fn from_label(label: &str) -> Option<Self> {
        let (year, round) = label.trim().split_once(' ')?;
        Some(Self {
            year: year.parse().ok()?,
            round: round.parse().ok()?,
        })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}년 {}", self.year, self.round)
    }
}

/// What a catalog request is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogScope {
    /// One row per control, no period dimension.
    Global,
    /// Rows for one (year, round).
    Period(Period),
}

impl CatalogScope {
    pub fn period(&self) -> Option<Period> {
        match self {
            Self::Global => None,
            Self::Period(p) => Some(*p),
        }
    }

    /// Query parameters for the list and export endpoints.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Global => Vec::new(),
            Self::Period(p) => vec![
                ("year", p.year.to_string()),
                ("round_name", p.round.as_str().to_string()),
            ],
        }
    }
}

impl fmt::Display for CatalogScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("all periods"),
            Self::Period(p) => write!(f, "{p}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_accepts_configured_values_only() {
        assert_eq!("2025".parse::<Year>().unwrap().value(), 2025);
        assert_eq!("2026년".parse::<Year>().unwrap().value(), 2026);
        assert!(matches!("2023".parse::<Year>(), Err(CoreError::UnknownYear(_))));
        assert!("twenty".parse::<Year>().is_err());
    }

    #[test]
    fn round_parses_label_and_alias() {
        assert_eq!("사후 1차".parse::<Round>().unwrap(), Round::FollowUp1);
        assert_eq!("갱신심사".parse::<Round>().unwrap(), Round::Renewal);
        assert_eq!("follow-up-2".parse::<Round>().unwrap(), Round::FollowUp2);
        assert_eq!("INITIAL".parse::<Round>().unwrap(), Round::Initial);
        assert!(matches!("사후 3차".parse::<Round>(), Err(CoreError::UnknownRound(_))));
    }

    #[test]
    fn labels_match_backend_strings() {
        let labels: Vec<&str> = Round::ALL.iter().map(|r| r.as_str()).collect();
        assert_eq!(labels, ["최초", "사후 1차", "사후 2차", "갱신심사"]);
        assert_eq!(Period::default().label(), "2025 최초");
    }

    #[test]
    fn label_roundtrip_with_space_in_round() {
        let period = Period::new(Year::new(2024).unwrap(), Round::FollowUp1);
        assert_eq!(period.label(), "2024 사후 1차");
        assert_eq!(Period::from_label(&period.label()), Some(period));
        assert_eq!(Period::from_label("2019 최초"), None);
        assert_eq!(Period::from_label("garbage"), None);
    }

    #[test]
    fn year_decodes_from_string_or_number() {
        let from_text: Year = serde_json::from_str(r#""2025""#).unwrap();
        let from_number: Year = serde_json::from_str("2025").unwrap();
        assert_eq!(from_text, from_number);
        assert_eq!(serde_json::to_string(&from_number).unwrap(), r#""2025""#);
        assert!(serde_json::from_str::<Year>("1999").is_err());
        assert!(serde_json::from_str::<Year>("70000").is_err());
    }

    #[test]
    fn scope_query_pairs() {
        assert!(CatalogScope::Global.query_pairs().is_empty());
        let pairs = CatalogScope::Period(Period::default()).query_pairs();
        assert_eq!(
            pairs,
            vec![("year", "2025".to_string()), ("round_name", "최초".to_string())]
        );
    }

    #[test]
    fn period_serializes_with_backend_field_names() {
        let json = serde_json::to_value(Period::default()).unwrap();
        assert_eq!(json["year"], "2025");
        assert_eq!(json["round_name"], "최초");
    }
}
