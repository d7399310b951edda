use crate::scorer::{
    score_batch, DistanceMetric, PassageScore, ScoreConversion, Scorer, SimilarityMetric,
    DEFAULT_SIMILARITY_THRESHOLD,
};
use crate::{Corpus, Embedder, Error, Result, Vector};
use std::sync::Arc;

/// Scores passages by comparing external embeddings.
///
/// The embedder and the stored passage vectors must share a dimension;
/// this is checked once in [`Scorer::validate`].
pub struct DenseScorer {
    embedder: Arc<dyn Embedder>,
    conversion: ScoreConversion,
}

impl DenseScorer {
    pub fn new(embedder: Arc<dyn Embedder>, conversion: ScoreConversion) -> Self {
        Self {
            embedder,
            conversion,
        }
    }

    #[inline]
    pub fn conversion(&self) -> ScoreConversion {
        self.conversion
    }

    /// Compare one query/passage pair under the configured conversion
    #[inline]
    pub fn compare(&self, index: usize, query: &Vector, passage: &Vector) -> PassageScore {
        match self.conversion {
            ScoreConversion::InverseDistance(metric) => {
                let distance = match metric {
                    DistanceMetric::L2 => passage.l2_distance(query),
                    DistanceMetric::L2Squared => passage.l2_distance_squared(query),
                };
                PassageScore {
                    index,
                    similarity: ScoreConversion::distance_to_similarity(distance),
                    distance: Some(distance),
                }
            }
            ScoreConversion::NativeSimilarity(metric) => {
                let similarity = match metric {
                    SimilarityMetric::Dot => passage.dot(query),
                    SimilarityMetric::Cosine => passage.cosine_similarity(query),
                };
                PassageScore::similarity(index, similarity)
            }
        }
    }
}

impl Scorer for DenseScorer {
    fn name(&self) -> &'static str {
        "dense"
    }

    fn default_threshold(&self) -> f32 {
        DEFAULT_SIMILARITY_THRESHOLD
    }

    fn validate(&self, corpus: &Corpus) -> Result<()> {
        if corpus.is_empty() {
            return Ok(());
        }
        let dense = corpus.dense().ok_or(Error::MissingFeatures("dense"))?;
        if dense.dim() != self.embedder.dim() {
            return Err(Error::InvalidDimension {
                expected: self.embedder.dim(),
                actual: dense.dim(),
            });
        }
        Ok(())
    }

    fn score_all(&self, query: &str, corpus: &Corpus) -> Result<Vec<PassageScore>> {
        let Some(dense) = corpus.dense() else {
            return Ok(Vec::new());
        };

        let query_vector = self.embedder.embed(query)?;
        if query_vector.dim() != dense.dim() {
            return Err(Error::InvalidDimension {
                expected: dense.dim(),
                actual: query_vector.dim(),
            });
        }
        if query_vector.norm() == 0.0 {
            return Ok(Vec::new());
        }

        let vectors = dense.vectors();
        Ok(score_batch(vectors.len(), |index| {
            self.compare(index, &query_vector, &vectors[index])
        }))
    }
}
