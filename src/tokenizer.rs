//! Free-text tokenizing for address comparison.

use serde::Serialize;

/// Sorted sequence of canonical tokens.
///
/// A token is a non-empty lowercase run of ASCII letters and digits.
/// Duplicates are kept, since the scorer counts every occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TokenSet(Vec<String>);

impl TokenSet {
    /// Create an empty token set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tokens, duplicates included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the set holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Exact-match membership test.
    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }

    /// Iterate over the tokens in order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Borrow the tokens as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Consume the set, returning the tokens.
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Append another set's tokens after this one's, without re-sorting.
    pub fn extend(&mut self, other: TokenSet) {
        self.0.extend(other.0);
    }
}

impl<'a> IntoIterator for &'a TokenSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Tokenize a free-text address field.
///
/// Anything other than ASCII letters, digits and spaces is dropped, the rest
/// is lowercased and split on spaces. A word of digits followed by letters
/// ("47a") becomes two tokens ("47", "a"). The result is sorted.
///
/// # Example
///
/// ```rust
/// use postcode_resolver::tokenize;
///
/// let tokens = tokenize("Flat 47a, Rose Tower");
/// assert_eq!(tokens.as_slice(), ["47", "a", "flat", "rose", "tower"]);
/// ```
pub fn tokenize(text: &str) -> TokenSet {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let mut tokens = Vec::new();
    for word in cleaned.split(' ').filter(|word| !word.is_empty()) {
        match split_numeric_suffix(word) {
            Some((digits, letters)) => {
                tokens.push(digits.to_string());
                tokens.push(letters.to_string());
            }
            None => tokens.push(word.to_string()),
        }
    }

    tokens.sort();
    TokenSet(tokens)
}

/// Split "47a" into ("47", "a"). Only matches digits-then-letters words.
fn split_numeric_suffix(word: &str) -> Option<(&str, &str)> {
    let boundary = word.find(|c: char| !c.is_ascii_digit())?;
    if boundary == 0 {
        return None;
    }

    let (digits, letters) = word.split_at(boundary);
    if letters.chars().all(|c| c.is_ascii_lowercase()) {
        Some((digits, letters))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        tokenize(text).into_vec()
    }

    #[test]
    fn test_tokenize_sorts_and_lowercases() {
        assert_eq!(
            tokens("62 Clarence Parade"),
            vec!["62", "clarence", "parade"]
        );
        assert_eq!(tokens("Rose TOWER"), vec!["rose", "tower"]);
    }

    #[test]
    fn test_tokenize_strips_punctuation() {
        assert_eq!(tokenize("Flat 25"), tokenize("Flat, 25!"));
        assert_eq!(tokens("St. Mary's Road"), vec!["marys", "road", "st"]);
    }

    #[test]
    fn test_tokenize_splits_numeric_suffix() {
        assert_eq!(tokens("47a"), vec!["47", "a"]);
        assert_eq!(tokens("Flat 12B"), vec!["12", "b", "flat"]);
    }

    #[test]
    fn test_tokenize_leaves_other_compounds_whole() {
        assert_eq!(tokens("a47"), vec!["a47"]);
        assert_eq!(tokens("12b3"), vec!["12b3"]);
        assert_eq!(tokens("po52hx"), vec!["po52hx"]);
    }

    #[test]
    fn test_tokenize_keeps_duplicates() {
        assert_eq!(tokens("20 Rose 20"), vec!["20", "20", "rose"]);
    }

    #[test]
    fn test_tokenize_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
        assert!(tokenize(",.-!").is_empty());
    }

    #[test]
    fn test_tokenize_drops_non_ascii_and_tabs() {
        assert_eq!(tokens("Café\tRoad"), vec!["cafroad"]);
    }

    #[test]
    fn test_tokenize_idempotent() {
        for text in ["Flat 47a, Rose Tower", "62 Clarence Parade", "12B  Baker St."] {
            let once = tokenize(text);
            let again = tokenize(&once.as_slice().join(" "));
            assert_eq!(once, again, "re-tokenizing {text:?}");
        }
    }

    #[test]
    fn test_token_set_extend_keeps_order() {
        let mut set = tokenize("rose tower");
        set.extend(tokenize("62"));
        assert_eq!(set.as_slice(), ["rose", "tower", "62"]);
        assert!(set.contains("62"));
        assert!(!set.contains("6"));
    }
}
