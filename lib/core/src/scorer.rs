//! Scoring strategies
//!
//! Every strategy implements one capability: score a query against every
//! passage of a corpus. [`ScoringStrategy`] is the serializable tag used to
//! select and construct a scorer when the retriever is built.

use crate::dense::DenseScorer;
use crate::lexical::{KeywordOverlapScorer, LexicalCosineScorer};
use crate::{Corpus, Embedder, Error, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Corpora at least this large are scored on the rayon pool
pub const PARALLEL_SCORING_THRESHOLD: usize = 4096;

/// Default relevance threshold for cosine-like similarities
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.1;

/// Keyword overlap keeps anything with at least one match
pub const DEFAULT_OVERLAP_THRESHOLD: f32 = 0.0;

/// Raw score of one passage before threshold and ranking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassageScore {
    pub index: usize,
    pub similarity: f32,
    /// Raw distance, present only for distance-based scorers
    pub distance: Option<f32>,
}

impl PassageScore {
    #[inline]
    pub fn similarity(index: usize, similarity: f32) -> Self {
        Self {
            index,
            similarity,
            distance: None,
        }
    }
}

pub trait Scorer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Threshold applied when the retriever config does not override it
    fn default_threshold(&self) -> f32;

    /// Check the corpus carries the features this scorer needs.
    /// Called once when the retriever is built, never per query.
    fn validate(&self, corpus: &Corpus) -> Result<()>;

    /// Score the query against every passage.
    ///
    /// Returns an empty vector when the query carries no usable signal
    /// (no known tokens, zero-norm embedding).
    fn score_all(&self, query: &str, corpus: &Corpus) -> Result<Vec<PassageScore>>;

    /// Score the query against a single passage
    fn score(&self, query: &str, corpus: &Corpus, index: usize) -> Result<f32> {
        Ok(self
            .score_all(query, corpus)?
            .into_iter()
            .find(|s| s.index == index)
            .map_or(0.0, |s| s.similarity))
    }
}

/// Score `count` passages with `f`, batching onto rayon for large corpora
pub(crate) fn score_batch<F>(count: usize, f: F) -> Vec<PassageScore>
where
    F: Fn(usize) -> PassageScore + Send + Sync,
{
    if count >= PARALLEL_SCORING_THRESHOLD {
        (0..count).into_par_iter().map(f).collect()
    } else {
        (0..count).map(f).collect()
    }
}

/// Distance metrics reported by distance-index backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    L2,
    /// What flat L2 indexes return
    L2Squared,
}

/// Metrics that already are similarities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    Dot,
    Cosine,
}

/// How a dense backend's raw number becomes a similarity score.
///
/// Thresholds and displayed relevance live on the similarity scale, so a
/// distance is always inverted with `1 / (1 + d)` and reported next to the
/// similarity; a native similarity is used as-is and carries no distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreConversion {
    InverseDistance(DistanceMetric),
    NativeSimilarity(SimilarityMetric),
}

impl ScoreConversion {
    /// `1 / (1 + d)`. A non-finite distance maps to NaN so ranking drops it.
    #[inline]
    pub fn distance_to_similarity(distance: f32) -> f32 {
        if !distance.is_finite() {
            return f32::NAN;
        }
        1.0 / (1.0 + distance.max(0.0))
    }
}

impl Default for ScoreConversion {
    fn default() -> Self {
        ScoreConversion::NativeSimilarity(SimilarityMetric::Cosine)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedStrategy {
    pub strategy: ScoringStrategy,
    pub weight: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// Cosine over frozen-vocabulary count vectors
    LexicalCosine,
    /// Fraction of distinct query words found in the passage
    KeywordOverlap,
    /// External embeddings compared under an explicit conversion
    Dense { conversion: ScoreConversion },
    /// Weighted sum of component similarities
    Hybrid { components: Vec<WeightedStrategy> },
}

impl Default for ScoringStrategy {
    fn default() -> Self {
        ScoringStrategy::LexicalCosine
    }
}

impl ScoringStrategy {
    /// Equal-weight lexical cosine + keyword overlap
    pub fn lexical_hybrid() -> Self {
        ScoringStrategy::Hybrid {
            components: vec![
                WeightedStrategy {
                    strategy: ScoringStrategy::LexicalCosine,
                    weight: 0.5,
                },
                WeightedStrategy {
                    strategy: ScoringStrategy::KeywordOverlap,
                    weight: 0.5,
                },
            ],
        }
    }

    pub fn requires_lexical(&self) -> bool {
        match self {
            ScoringStrategy::LexicalCosine => true,
            ScoringStrategy::KeywordOverlap | ScoringStrategy::Dense { .. } => false,
            ScoringStrategy::Hybrid { components } => {
                components.iter().any(|c| c.strategy.requires_lexical())
            }
        }
    }

    pub fn requires_dense(&self) -> bool {
        match self {
            ScoringStrategy::Dense { .. } => true,
            ScoringStrategy::LexicalCosine | ScoringStrategy::KeywordOverlap => false,
            ScoringStrategy::Hybrid { components } => {
                components.iter().any(|c| c.strategy.requires_dense())
            }
        }
    }

    /// Construct the scorer. Dense strategies need an embedder.
    pub fn build(&self, embedder: Option<Arc<dyn Embedder>>) -> Result<Box<dyn Scorer>> {
        match self {
            ScoringStrategy::LexicalCosine => Ok(Box::new(LexicalCosineScorer)),
            ScoringStrategy::KeywordOverlap => Ok(Box::new(KeywordOverlapScorer)),
            ScoringStrategy::Dense { conversion } => {
                let embedder = embedder.ok_or_else(|| {
                    Error::InvalidConfig("dense scoring requires an embedder".to_string())
                })?;
                Ok(Box::new(DenseScorer::new(embedder, *conversion)))
            }
            ScoringStrategy::Hybrid { components } => {
                let mut scorers = Vec::with_capacity(components.len());
                for component in components {
                    scorers.push((component.strategy.build(embedder.clone())?, component.weight));
                }
                Ok(Box::new(HybridScorer::new(scorers)?))
            }
        }
    }
}

/// Linear fusion of several scorers with weights normalized to sum to 1
pub struct HybridScorer {
    components: Vec<(Box<dyn Scorer>, f32)>,
}

impl HybridScorer {
    pub fn new(components: Vec<(Box<dyn Scorer>, f32)>) -> Result<Self> {
        if components.is_empty() {
            return Err(Error::InvalidConfig(
                "hybrid scoring needs at least one component".to_string(),
            ));
        }
        if components.iter().any(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(Error::InvalidConfig(
                "hybrid weights must be finite and non-negative".to_string(),
            ));
        }
        let total: f32 = components.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return Err(Error::InvalidConfig(
                "hybrid weights must not all be zero".to_string(),
            ));
        }

        let components = components
            .into_iter()
            .map(|(scorer, w)| (scorer, w / total))
            .collect();
        Ok(Self { components })
    }

    pub fn weights(&self) -> Vec<f32> {
        self.components.iter().map(|(_, w)| *w).collect()
    }
}

impl Scorer for HybridScorer {
    fn name(&self) -> &'static str {
        "hybrid"
    }

    fn default_threshold(&self) -> f32 {
        DEFAULT_SIMILARITY_THRESHOLD
    }

    fn validate(&self, corpus: &Corpus) -> Result<()> {
        for (scorer, _) in &self.components {
            scorer.validate(corpus)?;
        }
        Ok(())
    }

    fn score_all(&self, query: &str, corpus: &Corpus) -> Result<Vec<PassageScore>> {
        let mut fused = vec![0.0f32; corpus.len()];
        let mut any_signal = false;

        for (scorer, weight) in &self.components {
            let scores = scorer.score_all(query, corpus)?;
            if scores.is_empty() {
                continue;
            }
            any_signal = true;
            for score in scores {
                if let Some(slot) = fused.get_mut(score.index) {
                    *slot += weight * score.similarity;
                }
            }
        }

        if !any_signal {
            return Ok(Vec::new());
        }
        Ok(fused
            .into_iter()
            .enumerate()
            .map(|(index, similarity)| PassageScore::similarity(index, similarity))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_similarity() {
        assert_eq!(ScoreConversion::distance_to_similarity(0.0), 1.0);
        assert!((ScoreConversion::distance_to_similarity(1.0) - 0.5).abs() < 1e-6);
        assert!((ScoreConversion::distance_to_similarity(3.0) - 0.25).abs() < 1e-6);
        assert!(ScoreConversion::distance_to_similarity(f32::NAN).is_nan());
        assert!(ScoreConversion::distance_to_similarity(f32::INFINITY).is_nan());
    }

    #[test]
    fn test_strategy_requirements() {
        assert!(ScoringStrategy::LexicalCosine.requires_lexical());
        assert!(!ScoringStrategy::KeywordOverlap.requires_lexical());
        let dense = ScoringStrategy::Dense {
            conversion: ScoreConversion::default(),
        };
        assert!(dense.requires_dense());
        assert!(ScoringStrategy::lexical_hybrid().requires_lexical());
        assert!(!ScoringStrategy::lexical_hybrid().requires_dense());
    }

    #[test]
    fn test_dense_without_embedder_rejected() {
        let dense = ScoringStrategy::Dense {
            conversion: ScoreConversion::InverseDistance(DistanceMetric::L2),
        };
        assert!(matches!(dense.build(None), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_hybrid_weights_normalized() {
        let hybrid = HybridScorer::new(vec![
            (Box::new(LexicalCosineScorer) as Box<dyn Scorer>, 3.0),
            (Box::new(KeywordOverlapScorer) as Box<dyn Scorer>, 1.0),
        ])
        .unwrap();
        assert_eq!(hybrid.weights(), vec![0.75, 0.25]);

        assert!(HybridScorer::new(Vec::new()).is_err());
        assert!(HybridScorer::new(vec![(Box::new(LexicalCosineScorer) as Box<dyn Scorer>, 0.0)]).is_err());
    }

    #[test]
    fn test_hybrid_fuses_components() {
        let corpus = Corpus::build(["door sensor alignment", "brake coil inspection"]).unwrap();
        let hybrid = ScoringStrategy::lexical_hybrid().build(None).unwrap();
        let scores = hybrid.score_all("door sensor", &corpus).unwrap();
        assert_eq!(scores.len(), 2);

        let cosine = LexicalCosineScorer.score("door sensor", &corpus, 0).unwrap();
        let overlap = KeywordOverlapScorer.score("door sensor", &corpus, 0).unwrap();
        assert!((scores[0].similarity - (0.5 * cosine + 0.5 * overlap)).abs() < 1e-6);
        assert_eq!(scores[1].similarity, 0.0);
    }

    #[test]
    fn test_strategy_serde_tag() {
        let json = serde_json::to_string(&ScoringStrategy::Dense {
            conversion: ScoreConversion::InverseDistance(DistanceMetric::L2Squared),
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"kind":"dense","conversion":{"inverse_distance":"l2_squared"}}"#
        );
        let back: ScoringStrategy = serde_json::from_str(&json).unwrap();
        assert!(back.requires_dense());
    }

    #[test]
    fn test_parallel_batch_matches_sequential() {
        let count = PARALLEL_SCORING_THRESHOLD + 904;
        let f = |i: usize| PassageScore::similarity(i, ((i * 37) % 101) as f32 / 100.0);
        let parallel = score_batch(count, f);
        let sequential: Vec<PassageScore> = (0..count).map(f).collect();
        assert_eq!(parallel, sequential);
        assert_eq!(
            crate::rank(parallel, 0.1, 25),
            crate::rank(sequential, 0.1, 25)
        );
    }

    #[test]
    fn test_large_corpus_ranking() {
        let passages: Vec<String> = (0..PARALLEL_SCORING_THRESHOLD + 904)
            .map(|i| {
                if i % 2 == 0 {
                    format!("door sensor {}", i)
                } else {
                    format!("brake coil {}", i)
                }
            })
            .collect();
        let corpus = Corpus::build(&passages).unwrap();
        let retriever = crate::Retriever::with_scorer(
            corpus,
            Box::new(KeywordOverlapScorer),
            None,
            3,
        )
        .unwrap();

        let top: Vec<usize> = retriever
            .search_default("door sensor")
            .iter()
            .map(|r| r.index)
            .collect();
        assert_eq!(top, vec![0, 2, 4]);
        assert_eq!(retriever.search("door sensor", usize::MAX).len(), passages.len() / 2);
    }
}
