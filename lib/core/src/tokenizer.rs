//! Word tokenization shared by corpus build and query vectorization.
//!
//! A token is a maximal run of alphanumeric characters, case-folded. Callers
//! pick a minimum length in characters: the lexical feature space keeps tokens
//! longer than two characters, keyword overlap keeps words longer than three.

/// Minimum token length (in characters) for lexical feature space members
pub const LEXICAL_MIN_TOKEN_CHARS: usize = 3;

/// Minimum word length (in characters) for keyword overlap queries
pub const KEYWORD_MIN_WORD_CHARS: usize = 4;

/// Tokenize text into lowercased alphanumeric runs of at least `min_chars` characters
#[inline]
pub fn tokenize(text: &str, min_chars: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty() && s.chars().count() >= min_chars)
        .map(str::to_string)
        .collect()
}
