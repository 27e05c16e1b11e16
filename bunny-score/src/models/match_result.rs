//! Outcome of matching a company name against a brand list

use serde::Serialize;

/// Minimum (rounded) score for a match to count as found
pub const MATCH_THRESHOLD: f64 = 0.6;

/// Result of a fuzzy brand lookup
///
/// `found` is decided on the unrounded best score; `score` is the same value
/// rounded for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    found: bool,
    best_match: Option<String>,
    score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl MatchResult {
    /// Build a result from the raw best score; the reported score is rounded to 2 decimals
    pub fn from_score(best_match: Option<String>, raw_score: f64) -> Self {
        Self {
            found: raw_score >= MATCH_THRESHOLD,
            best_match,
            score: (raw_score * 100.0).round() / 100.0,
            error: None,
        }
    }

    /// Exact normalized match
    pub fn exact(best_match: impl Into<String>) -> Self {
        Self::from_score(Some(best_match.into()), 1.0)
    }

    /// No candidate matched at all
    pub fn not_found() -> Self {
        Self::from_score(None, 0.0)
    }

    /// The registry could not be consulted; carries the reason, never a verdict
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::not_found()
        }
    }

    pub fn found(&self) -> bool {
        self.found
    }

    pub fn best_match(&self) -> Option<&str> {
        self.best_match.as_deref()
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
