//! Address canonicalization into comparable token sets.

use crate::tokenizer::{tokenize, TokenSet};
use crate::types::Address;
use serde::Serialize;

/// Tokenized view of an [`Address`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenizedAddress {
    /// The address the tokens were derived from
    pub address: Address,
    /// Tokens from the three descriptive lines
    pub tokens: TokenSet,
    /// Tokens from building name, building number and sub-building name
    pub primary_tokens: TokenSet,
}

/// Canonicalize an address into general and primary tokens.
///
/// General tokens come from the descriptive lines joined with a space.
/// Primary tokens are building name, building number and sub-building name,
/// each tokenized on its own and appended in that order.
pub fn canonicalize(address: &Address) -> TokenizedAddress {
    let combined = address.lines().collect::<Vec<_>>().join(" ");

    let mut primary_tokens = tokenize(&address.building_name);
    primary_tokens.extend(tokenize(&address.building_number));
    primary_tokens.extend(tokenize(&address.sub_building_name));

    TokenizedAddress {
        address: address.clone(),
        tokens: tokenize(&combined),
        primary_tokens,
    }
}

impl From<&Address> for TokenizedAddress {
    fn from(address: &Address) -> Self {
        canonicalize(address)
    }
}
