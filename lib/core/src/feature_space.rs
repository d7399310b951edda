// Frozen token -> index mapping for lexical count vectors
use ahash::AHashMap;

use crate::tokenizer::{tokenize, LEXICAL_MIN_TOKEN_CHARS};
use crate::Vector;

#[derive(Debug, Clone, Default)]
pub struct FeatureSpace {
    // token -> dense index
    index: AHashMap<String, usize>,
    // dense index -> token, in first-seen order
    tokens: Vec<String>,
}

impl FeatureSpace {
    /// Build the vocabulary with one scan over `texts`.
    ///
    /// Indices are assigned in first-seen order, so the same texts in the same
    /// order always produce the same mapping.
    pub fn build<'a, I>(texts: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut space = Self::default();
        for text in texts {
            for token in Self::tokenize(text) {
                if !space.index.contains_key(&token) {
                    space.index.insert(token.clone(), space.tokens.len());
                    space.tokens.push(token);
                }
            }
        }
        space
    }

    /// Tokenize text with the vocabulary rule (alphanumeric runs longer than two characters)
    #[inline]
    pub fn tokenize(text: &str) -> Vec<String> {
        tokenize(text, LEXICAL_MIN_TOKEN_CHARS)
    }

    /// Vocabulary size, which is also the dimension of every count vector
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    #[inline]
    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// Count vector over the frozen vocabulary. Unknown tokens are dropped.
    pub fn vectorize(&self, text: &str) -> Vector {
        let mut counts = Vector::zeros(self.len());
        let slots = counts.as_mut_slice();
        for token in Self::tokenize(text) {
            if let Some(idx) = self.index_of(&token) {
                slots[idx] += 1.0;
            }
        }
        counts
    }
}
