//! Ranking of scored candidates and the match decision.

use crate::canonicalizer::canonicalize;
use crate::scorer::{score, ScoredCandidate};
use crate::types::Address;
use serde::Serialize;
use std::cmp::Reverse;
use tracing::debug;

/// Outcome of resolving an address against its candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    /// One candidate is preferred over every other
    Matched(ScoredCandidate),
    /// Several candidates share the top score and none is closer
    Ambiguous {
        /// Candidates tied on the highest score, best first
        tied: Vec<ScoredCandidate>,
    },
    /// The lookup returned no candidates
    NoCandidates,
}

impl Resolution {
    /// The accepted candidate, if there is one.
    pub fn matched(&self) -> Option<&ScoredCandidate> {
        match self {
            Resolution::Matched(candidate) => Some(candidate),
            _ => None,
        }
    }

    /// Check if a single candidate was accepted.
    pub fn is_match(&self) -> bool {
        matches!(self, Resolution::Matched(_))
    }

    /// Collapse into a list: the accepted candidate, or nothing.
    pub fn into_matches(self) -> Vec<ScoredCandidate> {
        match self {
            Resolution::Matched(candidate) => vec![candidate],
            Resolution::Ambiguous { .. } | Resolution::NoCandidates => Vec::new(),
        }
    }
}

/// Score every candidate against `address` and sort best first.
///
/// Higher score wins; on equal score the lower close penalty wins. Candidates
/// equal on both keep their input order.
pub fn rank(address: &Address, candidates: &[Address]) -> Vec<ScoredCandidate> {
    let target = canonicalize(address);

    let mut ranked: Vec<ScoredCandidate> = candidates
        .iter()
        .map(|candidate| score(canonicalize(candidate), &target))
        .collect();

    ranked.sort_by_key(|scored| (Reverse(scored.score), scored.close_penalty));
    ranked
}

/// Decide which candidate, if any, `address` refers to.
///
/// With a single candidate that candidate is accepted whatever its score.
/// Otherwise the best candidate is accepted when nothing else reaches its
/// score, or when it ties on score but has a strictly lower close penalty
/// than the runner-up. Any other tie is ambiguous.
pub fn resolve_decision(address: &Address, candidates: &[Address]) -> Resolution {
    let mut ranked = rank(address, candidates);

    for scored in &ranked {
        debug!(
            candidate = %scored.candidate.address,
            score = scored.score,
            close_penalty = scored.close_penalty,
            tokens = scored.token_count(),
            matches = ?scored.matches,
            "scored candidate"
        );
    }

    if ranked.len() < 2 {
        return match ranked.pop() {
            Some(only) => Resolution::Matched(only),
            None => Resolution::NoCandidates,
        };
    }

    let highest_score = ranked[0].score;
    let tied_count = ranked
        .iter()
        .take_while(|scored| scored.score == highest_score)
        .count();

    if tied_count == 1 || ranked[0].close_penalty < ranked[1].close_penalty {
        return Resolution::Matched(ranked.swap_remove(0));
    }

    ranked.truncate(tied_count);
    Resolution::Ambiguous { tied: ranked }
}

/// Resolve `address` against `candidates`.
///
/// Returns the accepted candidate as a one-element list, or an empty list
/// when there are no candidates or the match is ambiguous. Use
/// [`resolve_decision`] to tell those two apart.
///
/// # Example
///
/// ```rust
/// use postcode_resolver::{resolve, Address};
///
/// let target = Address::new()
///     .with_line_one("Flat 20")
///     .with_line_two("Rose Tower")
///     .with_postcode("PO5 2HX");
/// let candidates = vec![
///     Address::new().with_line_one("Flat 20").with_line_two("Rose Tower"),
///     Address::new().with_line_one("Flat 21").with_line_two("Rose Tower"),
/// ];
///
/// let matches = resolve(&target, &candidates);
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].candidate.address.line_one, "Flat 20");
/// ```
pub fn resolve(address: &Address, candidates: &[Address]) -> Vec<ScoredCandidate> {
    resolve_decision(address, candidates).into_matches()
}

/// Resolve many independent addresses in parallel.
///
/// Each entry pairs a target address with its own candidate list. Results
/// come back in input order.
#[cfg(feature = "parallel")]
pub fn resolve_batch_parallel(requests: &[(Address, Vec<Address>)]) -> Vec<Resolution> {
    use rayon::prelude::*;

    requests
        .par_iter()
        .map(|(address, candidates)| resolve_decision(address, candidates))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn rose_tower() -> Address {
        Address::new()
            .with_line_one("Flat 20")
            .with_line_two("Rose Tower")
            .with_line_three("62 Clarence Parade")
            .with_postcode("PO5 2HX")
    }

    fn unrelated() -> Address {
        Address::new()
            .with_line_one("1 Harbour View")
            .with_line_two("Old Portsmouth")
            .with_postcode("PO1 2AA")
    }

    #[test]
    fn test_exact_unique_match() {
        let candidates = vec![unrelated(), rose_tower()];

        let matches = resolve(&rose_tower(), &candidates);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].candidate.address, rose_tower());
        assert_eq!(matches[0].close_penalty, 0);
    }

    #[test]
    fn test_identical_candidate_ranks_first() {
        let candidates = vec![
            unrelated(),
            rose_tower().with_line_one("Flat 21"),
            rose_tower(),
        ];

        let ranked = rank(&rose_tower(), &candidates);
        assert_eq!(ranked.len(), candidates.len());
        assert_eq!(ranked[0].candidate.address, rose_tower());
        assert_eq!(ranked[0].close_penalty, 0);
        assert!(ranked.iter().all(|s| s.score <= ranked[0].score));
    }

    #[test]
    fn test_ambiguous_tie_returns_nothing() {
        let target = Address::new().with_line_one("Rose Tower");
        let candidates = vec![
            Address::new().with_line_one("Flat 20 Rose Tower"),
            Address::new().with_line_one("Flat 21 Rose Tower"),
        ];

        assert!(resolve(&target, &candidates).is_empty());
        assert_matches!(
            resolve_decision(&target, &candidates),
            Resolution::Ambiguous { tied } if tied.len() == 2
        );
    }

    #[test]
    fn test_identical_candidates_are_ambiguous() {
        let candidate = rose_tower().with_building_number("62");
        let candidates = vec![candidate.clone(), candidate];

        let ranked = rank(&rose_tower(), &candidates);
        assert_eq!(ranked[0].score, ranked[1].score);
        assert_eq!(ranked[0].close_penalty, ranked[1].close_penalty);
        assert!(resolve(&rose_tower(), &candidates).is_empty());
    }

    #[test]
    fn test_resolution_serializes_with_outcome_tag() {
        let target = Address::new().with_line_one("Flat 20 Rose Tower");
        let candidate = Address::new()
            .with_line_one("Flat 20 Rose Tower")
            .with_building_number("20");

        let decision = resolve_decision(&target, &[candidate]);
        let json = serde_json::to_value(&decision).unwrap();

        assert_eq!(json["outcome"], "matched");
        assert_eq!(json["score"], 5);
        assert_eq!(json["close_penalty"], 0);
        assert_eq!(
            json["candidate"]["tokens"],
            serde_json::json!(["20", "flat", "rose", "tower"])
        );
        assert_eq!(json["candidate"]["primary_tokens"], serde_json::json!(["20"]));
        assert_eq!(json["candidate"]["address"]["line_1"], "Flat 20 Rose Tower");
        assert_eq!(json["matches"], serde_json::json!(["20", "flat", "rose", "tower"]));

        let json = serde_json::to_value(Resolution::NoCandidates).unwrap();
        assert_eq!(json, serde_json::json!({"outcome": "no_candidates"}));

        let json = serde_json::to_value(Resolution::Ambiguous { tied: Vec::new() }).unwrap();
        assert_eq!(json, serde_json::json!({"outcome": "ambiguous", "tied": []}));
    }

    #[test]
    fn test_no_candidates() {
        assert!(resolve(&rose_tower(), &[]).is_empty());
        assert_eq!(resolve_decision(&rose_tower(), &[]), Resolution::NoCandidates);
    }

    #[test]
    fn test_single_candidate_accepted_regardless_of_score() {
        let decision = resolve_decision(&rose_tower(), &[unrelated()]);

        assert_matches!(decision, Resolution::Matched(ref only) if only.score == 0);
        assert_eq!(decision.into_matches().len(), 1);
    }

    #[test]
    fn test_primary_weighting_falls_back_to_close_penalty() {
        let target = Address::new().with_line_one("20 Rose Tower");
        // One shared token that is also primary: score 2, penalty 0.
        let primary = Address::new()
            .with_line_one("20")
            .with_building_number("20");
        // Two shared general tokens: score 2, penalty 2.
        let general = Address::new().with_line_one("Rose Tower Annex Road");

        let ranked = rank(&target, &[general.clone(), primary.clone()]);
        assert_eq!(ranked[0].score, ranked[1].score);

        let matches = resolve(&target, &[general, primary.clone()]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].candidate.address, primary);
    }

    #[test]
    fn test_lower_scores_do_not_make_a_tie() {
        let target = rose_tower();
        let candidates = vec![
            Address::new().with_line_one("Rose Tower"),
            rose_tower().with_line_one("Flat 21"),
            Address::new().with_line_one("Clarence Parade"),
        ];

        let decision = resolve_decision(&target, &candidates);
        assert_eq!(
            decision.matched().map(|m| &m.candidate.address),
            Some(&candidates[1])
        );
    }

    #[test]
    fn test_tie_listing_excludes_lower_scores() {
        let target = Address::new().with_line_one("Rose Tower");
        let candidates = vec![
            Address::new().with_line_one("Rose"),
            Address::new().with_line_one("Rose Tower Flat 1"),
            Address::new().with_line_one("Rose Tower Flat 2"),
        ];

        assert_matches!(
            resolve_decision(&target, &candidates),
            Resolution::Ambiguous { tied } if tied.iter().all(|t| t.score == 2) && tied.len() == 2
        );
    }

    #[test]
    fn test_all_empty_candidates_are_ambiguous() {
        let candidates = vec![Address::new(), Address::new()];
        assert!(resolve(&rose_tower(), &candidates).is_empty());
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let candidates = vec![
            unrelated(),
            rose_tower().with_line_one("Flat 21"),
            rose_tower(),
            Address::new().with_line_one("Rose Tower"),
        ];

        let first = resolve_decision(&rose_tower(), &candidates);
        let second = resolve_decision(&rose_tower(), &candidates);
        assert_eq!(first, second);
    }

    #[test]
    fn test_repeated_calls_do_not_accumulate() {
        let candidates = vec![rose_tower()];

        for _ in 0..3 {
            assert_eq!(rank(&rose_tower(), &candidates).len(), 1);
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_resolve_batch_parallel_keeps_order() {
        let requests = vec![
            (rose_tower(), vec![unrelated(), rose_tower()]),
            (rose_tower(), Vec::new()),
        ];

        let results = resolve_batch_parallel(&requests);
        assert!(results[0].is_match());
        assert_eq!(results[1], Resolution::NoCandidates);
    }
}
