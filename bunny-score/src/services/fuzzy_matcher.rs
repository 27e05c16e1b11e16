//! Fuzzy brand name matching
//!
//! Resolves a company name against a brand list with a graded confidence.
//! Both sides are normalized the same way, then each candidate is scored by
//! the first rule that applies:
//!
//! 1. Exact normalized equality: score 1.0, returned immediately.
//! 2. Substring containment (either direction): `0.5 + 0.5 * shorter / longer`.
//!    An empty normalized name is contained in any other.
//! 3. Edit-distance similarity: `1 - levenshtein / longer`.
//!
//! The best score across all candidates wins; `found` means the unrounded
//! best score is >= 0.6.

use crate::models::MatchResult;

/// Normalize a brand or company name for comparison
///
/// Lowercase, keep only ASCII letters, digits and whitespace (which also
/// drops ®, ™ and ©), collapse whitespace runs, trim.
pub fn normalize(name: &str) -> String {
    let kept: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Unit-cost edit distance
pub fn levenshtein(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// `1 - distance / longer length`; two empty strings are identical
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

/// Substring rule score; always >= 0.5
fn containment_score(query_len: usize, candidate_len: usize) -> f64 {
    let shorter = query_len.min(candidate_len) as f64;
    let longer = query_len.max(candidate_len) as f64;
    0.5 + 0.5 * (shorter / longer)
}

/// Match `query` against `candidates`
///
/// Pure and total: an empty candidate list yields `found: false, bestMatch: null, score: 0`.
/// `bestMatch` is reported with the candidate's original spelling.
pub fn fuzzy_match<S: AsRef<str>>(query: &str, candidates: &[S]) -> MatchResult {
    let norm_query = normalize(query);
    let mut best_match: Option<&str> = None;
    let mut best_score = 0.0_f64;

    for candidate in candidates {
        let candidate = candidate.as_ref();
        let norm_candidate = normalize(candidate);

        // Two names that both normalize to nothing are not equal, except the
        // literal empty-to-empty comparison.
        if norm_query.is_empty() && norm_candidate.is_empty() {
            if query.is_empty() && candidate.is_empty() {
                return MatchResult::exact(candidate);
            }
            continue;
        }

        if norm_query == norm_candidate {
            return MatchResult::exact(candidate);
        }

        let score = if norm_candidate.contains(&norm_query) || norm_query.contains(&norm_candidate) {
            containment_score(norm_query.len(), norm_candidate.len())
        } else {
            similarity(&norm_query, &norm_candidate)
        };

        if score > best_score {
            best_score = score;
            best_match = Some(candidate);
        }
    }

    MatchResult::from_score(best_match.map(str::to_string), best_score)
}
