//! Candidate scoring against a target address.

use crate::canonicalizer::TokenizedAddress;
use serde::Serialize;

/// Score added for a matched token that is also one of the candidate's
/// identifying (primary) tokens.
pub const PRIMARY_TOKEN_WEIGHT: usize = 2;

/// Score added for any other matched token.
pub const GENERAL_TOKEN_WEIGHT: usize = 1;

/// A candidate address with its similarity to the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredCandidate {
    /// The tokenized candidate
    pub candidate: TokenizedAddress,
    /// Weighted number of candidate tokens found in the target
    pub score: usize,
    /// Number of candidate tokens found in the target
    pub match_count: usize,
    /// Distance between `match_count` and the candidate's token count
    pub close_penalty: usize,
    /// Matched tokens in candidate order, duplicates included
    pub matches: Vec<String>,
}

/// Score a candidate against the target.
///
/// Each of the candidate's general tokens that the target also has counts as
/// a match, worth [`PRIMARY_TOKEN_WEIGHT`] when the token is one of the
/// candidate's primary tokens and [`GENERAL_TOKEN_WEIGHT`] otherwise. The
/// close penalty is how many of the candidate's tokens went unmatched.
pub fn score(candidate: TokenizedAddress, target: &TokenizedAddress) -> ScoredCandidate {
    let token_count = candidate.tokens.len();
    let mut matches = Vec::new();
    let mut total = 0;

    for token in candidate.tokens.iter() {
        if !target.tokens.contains(token) {
            continue;
        }

        matches.push(token.clone());
        total += if candidate.primary_tokens.contains(token) {
            PRIMARY_TOKEN_WEIGHT
        } else {
            GENERAL_TOKEN_WEIGHT
        };
    }

    let match_count = matches.len();
    ScoredCandidate {
        candidate,
        score: total,
        match_count,
        close_penalty: match_count.abs_diff(token_count),
        matches,
    }
}

impl ScoredCandidate {
    /// Number of general tokens in the candidate.
    pub fn token_count(&self) -> usize {
        self.candidate.tokens.len()
    }
}
