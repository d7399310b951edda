use crate::{Error, FeatureSpace, Passage, Result, Vector};
use tracing::debug;

/// Minimum stripped length of a passage produced by document-level chunking
pub const DOCUMENT_MIN_PASSAGE_CHARS: usize = 50;

/// Lexical count vectors over a frozen feature space, one per passage
#[derive(Debug, Clone, Default)]
pub struct LexicalFeatures {
    space: FeatureSpace,
    vectors: Vec<Vector>,
    norms: Vec<f32>,
}

impl LexicalFeatures {
    fn build(passages: &[Passage]) -> Self {
        let space = FeatureSpace::build(passages.iter().map(Passage::text));
        let vectors: Vec<Vector> = passages
            .iter()
            .map(|p| space.vectorize(p.text()))
            .collect();
        let norms = vectors.iter().map(Vector::norm).collect();
        Self {
            space,
            vectors,
            norms,
        }
    }

    #[inline]
    pub fn space(&self) -> &FeatureSpace {
        &self.space
    }

    #[inline]
    pub fn vectors(&self) -> &[Vector] {
        &self.vectors
    }

    /// Precomputed norm of each passage vector
    #[inline]
    pub fn norms(&self) -> &[f32] {
        &self.norms
    }
}

/// Externally produced embedding rows, one per passage
#[derive(Debug, Clone, Default)]
pub struct DenseFeatures {
    dim: usize,
    vectors: Vec<Vector>,
}

impl DenseFeatures {
    /// Wrap embedding rows; every row must have `dim` components
    pub fn new(dim: usize, vectors: Vec<Vector>) -> Result<Self> {
        if let Some(bad) = vectors.iter().find(|v| v.dim() != dim) {
            return Err(Error::InvalidDimension {
                expected: dim,
                actual: bad.dim(),
            });
        }
        Ok(Self { dim, vectors })
    }

    /// Split a row-major matrix into rows
    pub fn from_row_major(rows: usize, dim: usize, data: &[f32]) -> Result<Self> {
        let expected = rows.checked_mul(dim).ok_or_else(|| {
            Error::Serialization(format!("matrix of {} x {} is too large", rows, dim))
        })?;
        if data.len() != expected {
            return Err(Error::Serialization(format!(
                "matrix of {} x {} needs {} values, found {}",
                rows,
                dim,
                expected,
                data.len()
            )));
        }
        if dim == 0 && rows > 0 {
            return Err(Error::Serialization(format!(
                "matrix of {} rows has zero-width rows",
                rows
            )));
        }
        let vectors = data.chunks_exact(dim.max(1)).map(Vector::from_slice).collect();
        Ok(Self { dim, vectors })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    pub fn vectors(&self) -> &[Vector] {
        &self.vectors
    }
}

/// Ordered, immutable set of manual passages plus optional per-passage features.
///
/// Built once and rebuilt wholesale; there is no way to patch a corpus in place.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    passages: Vec<Passage>,
    lexical: Option<LexicalFeatures>,
    dense: Option<DenseFeatures>,
}

impl Corpus {
    /// A corpus with no passages (degraded mode)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from raw passages with lexical features and the default length policy
    pub fn build<I, S>(passages: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        CorpusBuilder::new().build(passages)
    }

    /// Attach dense features. Row count must match the passage count exactly.
    pub fn with_dense_features(mut self, features: DenseFeatures) -> Result<Self> {
        if features.rows() != self.passages.len() {
            return Err(Error::MalformedFeatureStore {
                rows: features.rows(),
                passages: self.passages.len(),
            });
        }
        self.dense = Some(features);
        Ok(self)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    #[inline]
    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    #[inline]
    pub fn passage(&self, index: usize) -> Option<&Passage> {
        self.passages.get(index)
    }

    #[inline]
    pub fn lexical(&self) -> Option<&LexicalFeatures> {
        self.lexical.as_ref()
    }

    #[inline]
    pub fn dense(&self) -> Option<&DenseFeatures> {
        self.dense.as_ref()
    }

    /// Passage texts in corpus order
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.passages.iter().map(Passage::text)
    }

    fn validate(&self) -> Result<()> {
        if let Some(lexical) = &self.lexical {
            if lexical.vectors.len() != self.passages.len() {
                return Err(Error::MalformedFeatureStore {
                    rows: lexical.vectors.len(),
                    passages: self.passages.len(),
                });
            }
            let dim = lexical.space.len();
            if let Some(bad) = lexical.vectors.iter().find(|v| v.dim() != dim) {
                return Err(Error::InvalidDimension {
                    expected: dim,
                    actual: bad.dim(),
                });
            }
        }
        Ok(())
    }
}

/// Builder applying the passage length policy and feature extraction
#[derive(Debug, Clone)]
pub struct CorpusBuilder {
    min_passage_chars: usize,
    lexical: bool,
}

impl Default for CorpusBuilder {
    fn default() -> Self {
        Self {
            min_passage_chars: 1,
            lexical: true,
        }
    }
}

impl CorpusBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard passages whose stripped length (in characters) is below `chars`
    #[must_use]
    pub fn min_passage_chars(mut self, chars: usize) -> Self {
        self.min_passage_chars = chars.max(1);
        self
    }

    #[must_use]
    pub fn lexical_features(mut self, enabled: bool) -> Self {
        self.lexical = enabled;
        self
    }

    pub fn build<I, S>(self, passages: I) -> Result<Corpus>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept = Vec::new();
        let mut dropped = 0usize;
        for raw in passages {
            let text = raw.as_ref().trim();
            if text.chars().count() < self.min_passage_chars {
                dropped += 1;
                continue;
            }
            kept.push(Passage::new(kept.len(), text));
        }

        let lexical = self.lexical.then(|| LexicalFeatures::build(&kept));
        let corpus = Corpus {
            passages: kept,
            lexical,
            dense: None,
        };
        corpus.validate()?;

        debug!(
            passages = corpus.len(),
            dropped,
            vocabulary = corpus.lexical().map_or(0, |l| l.space().len()),
            "corpus built"
        );
        Ok(corpus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_keeps_order_and_strips() {
        let corpus = Corpus::build(["  first passage  ", "", "   ", "second passage"]).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.passage(0).unwrap().text(), "first passage");
        assert_eq!(corpus.passage(1).unwrap().text(), "second passage");
        assert_eq!(corpus.passage(1).unwrap().index(), 1);
    }

    #[test]
    fn test_min_length_policy() {
        let long = "x".repeat(DOCUMENT_MIN_PASSAGE_CHARS);
        let short = "y".repeat(DOCUMENT_MIN_PASSAGE_CHARS - 1);
        let corpus = CorpusBuilder::new()
            .min_passage_chars(DOCUMENT_MIN_PASSAGE_CHARS)
            .build([format!("  {}  ", short), long.clone()])
            .unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.passage(0).unwrap().text(), long);
    }

    #[test]
    fn test_lexical_vectors_share_vocabulary_dimension() {
        let corpus = Corpus::build(["door sensor", "brake coil voltage"]).unwrap();
        let lexical = corpus.lexical().unwrap();
        assert_eq!(lexical.space().len(), 5);
        assert!(lexical.vectors().iter().all(|v| v.dim() == 5));
        assert!((lexical.norms()[0] - 2.0f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_lexical_features_optional() {
        let corpus = CorpusBuilder::new()
            .lexical_features(false)
            .build(["door sensor"])
            .unwrap();
        assert!(corpus.lexical().is_none());
    }

    #[test]
    fn test_dense_row_mismatch_is_fatal() {
        let corpus = Corpus::build(["a passage", "another passage"]).unwrap();
        let rows = DenseFeatures::from_row_major(3, 2, &[0.0; 6]).unwrap();
        let err = corpus.with_dense_features(rows).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedFeatureStore { rows: 3, passages: 2 }
        ));
    }

    #[test]
    fn test_dense_row_width_checked() {
        let err = DenseFeatures::new(
            2,
            vec![Vector::new(vec![1.0, 0.0]), Vector::new(vec![1.0])],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { expected: 2, actual: 1 }));

        assert!(DenseFeatures::from_row_major(2, 3, &[0.0; 5]).is_err());
    }

    #[test]
    fn test_row_major_shape_overflow_rejected() {
        let err = DenseFeatures::from_row_major(usize::MAX / 2 + 1, 2, &[]).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(matches!(
            DenseFeatures::from_row_major(usize::MAX, 0, &[]),
            Err(Error::Serialization(_))
        ));
        assert_eq!(DenseFeatures::from_row_major(0, 0, &[]).unwrap().rows(), 0);
    }
}
