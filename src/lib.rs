//! # liftdoc
//!
//! Maintenance-manual retrieval with safety-first remediation advice.
//!
//! liftdoc scores every passage of a chunked maintenance manual against a
//! free-text fault description, keeps the few that clear a relevance
//! threshold, and renders a templated answer that always starts with safety
//! steps.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! liftdoc index --manual manual.txt
//! liftdoc ask "door not closing properly"
//! liftdoc repl
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use liftdoc::prelude::*;
//!
//! let corpus = Corpus::build([
//!     "Door sensor alignment: clearance 5mm minimum.",
//!     "Safety circuit testing procedure.",
//!     "Error code E5: door obstruction detected.",
//! ])
//! .unwrap();
//! let retriever = Retriever::new(corpus, RetrieverConfig::default(), None).unwrap();
//!
//! let advice = Assistant::new(retriever).ask("door obstruction");
//! assert!(advice.text.contains("Error code E5"));
//! ```
//!
//! ## Crate Structure
//!
//! - `liftdoc-core` - Passages, corpus, feature space, scoring strategies, retriever
//! - `liftdoc-storage` - Corpus file, feature store, manual chunking, knowledge base
//! - `liftdoc-advisor` - Issue categorization and advice templating
//!
//! ## Scoring Strategies
//!
//! - **Lexical cosine**: count vectors over a frozen vocabulary (default)
//! - **Keyword overlap**: fraction of query words found in a passage
//! - **Dense**: external embeddings with an explicit distance/similarity conversion
//! - **Hybrid**: weighted sum of the above

// Re-export core types
pub use liftdoc_core::{
    Corpus, CorpusBuilder, DenseFeatures, Embedder, HashEmbedder,
    FeatureSpace, Passage, Vector,
    Retriever, RetrieverConfig, ScoredResult,
    Scorer, ScoringStrategy, ScoreConversion, DistanceMetric, SimilarityMetric,
    Error, Result,
};

// Re-export storage
pub use liftdoc_storage::{ChunkerConfig, FeatureStore, KnowledgeBase};

// Re-export advisor
pub use liftdoc_advisor::{Advice, Advisor, Assistant, IssueCategory};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Corpus, CorpusBuilder, Embedder, HashEmbedder,
        Retriever, RetrieverConfig, ScoredResult,
        ScoringStrategy, ScoreConversion, DistanceMetric, SimilarityMetric,
        Error, Result,
        ChunkerConfig, KnowledgeBase,
        Advice, Advisor, Assistant, IssueCategory,
    };
}
