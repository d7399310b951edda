use crate::scorer::{PassageScore, Scorer, ScoringStrategy};
use crate::{Corpus, Embedder, Error, Result};
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, warn};

/// Default number of passages returned per query
pub const DEFAULT_TOP_K: usize = 2;

/// Configuration for a retriever
#[derive(Debug, Clone, PartialEq)]
pub struct RetrieverConfig {
    pub strategy: ScoringStrategy,
    pub top_k: usize,
    /// Overrides the strategy's default relevance threshold
    pub threshold: Option<f32>,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            strategy: ScoringStrategy::LexicalCosine,
            top_k: DEFAULT_TOP_K,
            threshold: None,
        }
    }
}

/// One ranked passage.
///
/// Serializes as `{"text", "similarity", "distance"?}`; `distance` is omitted
/// entirely for similarity-native scorers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    #[serde(skip)]
    pub index: usize,
    pub text: Arc<str>,
    pub similarity: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
}

/// Ranked passage retrieval over an owned corpus
pub struct Retriever {
    corpus: Corpus,
    scorer: Box<dyn Scorer>,
    threshold: f32,
    top_k: usize,
}

impl Retriever {
    /// Build the scorer named by `config` and validate it against the corpus
    pub fn new(
        corpus: Corpus,
        config: RetrieverConfig,
        embedder: Option<Arc<dyn Embedder>>,
    ) -> Result<Self> {
        let scorer = config.strategy.build(embedder)?;
        Self::with_scorer(corpus, scorer, config.threshold, config.top_k)
    }

    pub fn with_scorer(
        corpus: Corpus,
        scorer: Box<dyn Scorer>,
        threshold: Option<f32>,
        top_k: usize,
    ) -> Result<Self> {
        scorer.validate(&corpus)?;
        let threshold = threshold.unwrap_or_else(|| scorer.default_threshold());
        if threshold.is_nan() {
            return Err(Error::InvalidConfig("threshold must be a number".to_string()));
        }
        Ok(Self {
            corpus,
            scorer,
            threshold,
            top_k: top_k.max(1),
        })
    }

    #[inline]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    #[inline]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Configured default for [`Retriever::search_default`]
    #[inline]
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    #[inline]
    pub fn scorer_name(&self) -> &'static str {
        self.scorer.name()
    }

    /// Ranked results for `query`; an empty vector when nothing is relevant.
    ///
    /// Never fails: a scorer error (external embedder) is logged and yields
    /// no results. Use [`Retriever::try_search`] to observe it.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<ScoredResult> {
        match self.try_search(query, top_k) {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "search failed, returning no results");
                Vec::new()
            }
        }
    }

    /// [`Retriever::search`] with the configured top_k
    pub fn search_default(&self, query: &str) -> Vec<ScoredResult> {
        self.search(query, self.top_k)
    }

    pub fn try_search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredResult>> {
        if self.corpus.is_empty() || query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let scores = self.scorer.score_all(query, &self.corpus)?;
        let ranked = rank(scores, self.threshold, top_k);
        debug!(
            scorer = self.scorer.name(),
            results = ranked.len(),
            top = ranked.first().map(|s| s.similarity),
            "search complete"
        );

        Ok(ranked
            .into_iter()
            .filter_map(|score| {
                let passage = self.corpus.passage(score.index)?;
                Some(ScoredResult {
                    index: score.index,
                    text: passage.shared_text(),
                    similarity: score.similarity,
                    distance: score.distance,
                })
            })
            .collect())
    }
}

/// Descending similarity, ties by ascending passage index
#[inline]
fn rank_order(a: &PassageScore, b: &PassageScore) -> Ordering {
    OrderedFloat(b.similarity)
        .cmp(&OrderedFloat(a.similarity))
        .then_with(|| a.index.cmp(&b.index))
}

/// Drop scores at or below `threshold`, then keep the best `top_k`.
///
/// When fewer than all survivors are wanted, the top_k are partitioned out
/// first (O(n)) and only they are sorted (O(k log k)). The comparator is a
/// total order, so the result equals a full sort truncated to top_k.
pub fn rank(scores: Vec<PassageScore>, threshold: f32, top_k: usize) -> Vec<PassageScore> {
    let top_k = top_k.max(1);
    let mut survivors: Vec<PassageScore> = scores
        .into_iter()
        .filter(|s| s.similarity.is_finite() && s.similarity > threshold)
        .collect();

    if top_k < survivors.len() {
        survivors.select_nth_unstable_by(top_k - 1, rank_order);
        survivors.truncate(top_k);
    }
    survivors.sort_unstable_by(rank_order);
    survivors
}
