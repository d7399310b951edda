//! # liftdoc Core
//!
//! Core library for the liftdoc maintenance assistant.
//!
//! This crate provides the retrieval-and-ranking core:
//!
//! - [`Passage`] - An immutable manual passage with a stable index
//! - [`Corpus`] - Ordered passages plus optional lexical/dense features
//! - [`FeatureSpace`] - Frozen token to index mapping for count vectors
//! - [`Scorer`] - Scoring strategies (lexical cosine, keyword overlap, dense, hybrid)
//! - [`Retriever`] - Threshold, top-k selection and deterministic ranking
//!
//! ## Example
//!
//! ```rust
//! use liftdoc_core::{Corpus, Retriever, RetrieverConfig};
//!
//! let corpus = Corpus::build([
//!     "Door sensor alignment: clearance 5mm minimum.",
//!     "Safety circuit testing procedure.",
//!     "Error code E5: door obstruction detected.",
//! ])
//! .unwrap();
//!
//! let retriever = Retriever::new(corpus, RetrieverConfig::default(), None).unwrap();
//! let results = retriever.search("door obstruction", 2);
//! assert_eq!(results[0].index, 2);
//! ```

pub mod corpus;
pub mod dense;
pub mod embedder;
pub mod error;
pub mod feature_space;
pub mod lexical;
pub mod passage;
pub mod retriever;
pub mod scorer;
pub mod tokenizer;
pub mod vector;

pub use corpus::{Corpus, CorpusBuilder, DenseFeatures, LexicalFeatures, DOCUMENT_MIN_PASSAGE_CHARS};
pub use dense::DenseScorer;
pub use embedder::{Embedder, HashEmbedder, DEFAULT_EMBEDDING_DIM};
pub use error::{Error, Result};
pub use feature_space::FeatureSpace;
pub use lexical::{KeywordOverlapScorer, LexicalCosineScorer};
pub use passage::Passage;
pub use retriever::{rank, Retriever, RetrieverConfig, ScoredResult, DEFAULT_TOP_K};
pub use scorer::{
    DistanceMetric, HybridScorer, PassageScore, ScoreConversion, Scorer, ScoringStrategy,
    SimilarityMetric, WeightedStrategy,
};
pub use vector::Vector;
