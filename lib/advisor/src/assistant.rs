use crate::advice::{Advice, Advisor};
use liftdoc_core::Retriever;
use tracing::debug;

/// Search the manual, then compose advice from what was found
pub struct Assistant {
    retriever: Retriever,
    advisor: Advisor,
}

impl Assistant {
    pub fn new(retriever: Retriever) -> Self {
        Self {
            retriever,
            advisor: Advisor::default(),
        }
    }

    #[must_use]
    pub fn with_advisor(mut self, advisor: Advisor) -> Self {
        self.advisor = advisor;
        self
    }

    #[inline]
    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Answer a fault description using the retriever's configured top_k
    pub fn ask(&self, query: &str) -> Advice {
        let results = self.retriever.search_default(query);
        debug!(query, sources = results.len(), "composing advice");
        self.advisor.advise(query, results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::FALLBACK_ADVICE;
    use crate::IssueCategory;
    use liftdoc_core::{Corpus, RetrieverConfig};

    #[test]
    fn test_ask_cites_top_passage() {
        let corpus = Corpus::build([
            "Door sensor alignment: clearance 5mm minimum.",
            "Safety circuit testing procedure.",
            "Error code E5: door obstruction detected.",
        ])
        .unwrap();
        let retriever = Retriever::new(corpus, RetrieverConfig::default(), None).unwrap();
        let assistant = Assistant::new(retriever);

        let advice = assistant.ask("door obstruction");
        assert_eq!(advice.sources.len(), 2);
        assert_eq!(advice.sources[0].index, 2);
        assert_eq!(advice.category, Some(IssueCategory::Door));
        assert!(advice.text.contains("Error code E5"));
    }

    #[test]
    fn test_ask_empty_corpus_falls_back() {
        let retriever = Retriever::new(Corpus::empty(), RetrieverConfig::default(), None).unwrap();
        let advice = Assistant::new(retriever).ask("elevator stuck");
        assert_eq!(advice.text, FALLBACK_ADVICE);
        assert!(advice.sources.is_empty());
    }
}
