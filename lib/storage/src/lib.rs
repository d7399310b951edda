//! # liftdoc Storage
//!
//! On-disk side of liftdoc: the corpus file (one passage per line), the
//! dense feature store, manual cleaning/chunking, and [`KnowledgeBase`],
//! which loads a data directory into a ready [`liftdoc_core::Retriever`].

pub mod chunker;
pub mod corpus_file;
pub mod feature_store;
pub mod knowledge_base;

pub use chunker::{chunk_text, clean_text, ChunkerConfig, DEFAULT_CHUNK_CHARS};
pub use corpus_file::{load_passages, save_passages};
pub use feature_store::{corpus_fingerprint, FeatureStore};
pub use knowledge_base::{IndexSummary, KnowledgeBase, CORPUS_FILE, FEATURE_FILE};
