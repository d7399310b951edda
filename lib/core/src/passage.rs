use std::sync::Arc;

/// An immutable manual passage, identified by its position in the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    index: usize,
    text: Arc<str>,
    // Case-folded copy for substring matching
    folded: Arc<str>,
}

impl Passage {
    #[inline]
    #[must_use]
    pub fn new(index: usize, text: &str) -> Self {
        Self {
            index,
            text: Arc::from(text),
            folded: Arc::from(text.to_lowercase()),
        }
    }

    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Shared handle to the text, cheap to clone into results
    #[inline]
    #[must_use]
    pub fn shared_text(&self) -> Arc<str> {
        Arc::clone(&self.text)
    }

    /// Lowercased text
    #[inline]
    #[must_use]
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Length in characters
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
