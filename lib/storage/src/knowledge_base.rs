use crate::chunker::{chunk_text, clean_text, ChunkerConfig};
use crate::corpus_file::{load_passages, save_passages};
use crate::feature_store::{corpus_fingerprint, FeatureStore};
use liftdoc_core::{
    Corpus, CorpusBuilder, DenseFeatures, Embedder, Result, Retriever, RetrieverConfig,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Corpus file name inside a data directory
pub const CORPUS_FILE: &str = "chunks.txt";

/// Feature store file name inside a data directory
pub const FEATURE_FILE: &str = "features.bin";

/// Outcome of indexing a manual
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSummary {
    pub passages: usize,
    pub vocabulary: usize,
    pub embedding_dim: Option<usize>,
}

/// A loaded data directory: the corpus, its features and a ready retriever.
///
/// Constructed once per session and queried until dropped. A missing corpus
/// file puts it in degraded mode, where every query returns no results.
pub struct KnowledgeBase {
    data_dir: PathBuf,
    retriever: Retriever,
    degraded: bool,
}

impl KnowledgeBase {
    pub fn open<P: AsRef<Path>>(
        data_dir: P,
        config: RetrieverConfig,
        embedder: Option<Arc<dyn Embedder>>,
    ) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        let corpus_path = data_dir.join(CORPUS_FILE);
        let feature_path = data_dir.join(FEATURE_FILE);

        if !corpus_path.exists() {
            warn!(
                "Corpus file {:?} not found, running in degraded mode",
                corpus_path
            );
            let retriever = Retriever::new(Corpus::empty(), config, embedder)?;
            return Ok(Self {
                data_dir,
                retriever,
                degraded: true,
            });
        }

        let passages = load_passages(&corpus_path)?;
        let fingerprint = corpus_fingerprint(&passages);
        let mut corpus = CorpusBuilder::new()
            .lexical_features(config.strategy.requires_lexical())
            .build(&passages)?;

        if feature_path.exists() {
            let store = FeatureStore::load(&feature_path)?;
            if store.corpus_sha256 != fingerprint {
                warn!(
                    "Feature store {:?} was built from a different corpus",
                    feature_path
                );
            }
            if let Some(embedder) = &embedder {
                if store.embedder != embedder.name() {
                    warn!(
                        "Feature store was produced by {}, queries use {}",
                        store.embedder,
                        embedder.name()
                    );
                }
            }
            let features = store.into_dense_features(corpus.len())?;
            corpus = corpus.with_dense_features(features)?;
        } else if config.strategy.requires_dense() && !corpus.is_empty() {
            if let Some(embedder) = &embedder {
                info!("Creating embeddings for {} passages", corpus.len());
                let features = embed_corpus(embedder.as_ref(), &corpus)?;
                FeatureStore::from_vectors(
                    embedder.name(),
                    fingerprint,
                    features.dim(),
                    features.vectors(),
                )?
                .save(&feature_path)?;
                corpus = corpus.with_dense_features(features)?;
            }
        }

        info!(
            "Loaded {} passages from {:?}{}",
            corpus.len(),
            corpus_path,
            corpus
                .lexical()
                .map(|l| format!(" ({} unique words)", l.space().len()))
                .unwrap_or_default()
        );

        let retriever = Retriever::new(corpus, config, embedder)?;
        Ok(Self {
            data_dir,
            retriever,
            degraded: false,
        })
    }

    /// Clean and chunk `manual_text`, then write the corpus file and, when an
    /// embedder is given, the feature store. Replaces any previous index.
    pub fn index_manual<P: AsRef<Path>>(
        data_dir: P,
        manual_text: &str,
        chunker: &ChunkerConfig,
        embedder: Option<&dyn Embedder>,
    ) -> Result<IndexSummary> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)?;

        let cleaned = clean_text(manual_text);
        info!("Read {} characters from manual", cleaned.chars().count());

        let chunks = chunk_text(&cleaned, chunker);
        info!("Created {} text chunks", chunks.len());

        let corpus = Corpus::build(&chunks)?;
        save_passages(data_dir.join(CORPUS_FILE), &chunks)?;

        let feature_path = data_dir.join(FEATURE_FILE);
        let embedding_dim = match embedder {
            Some(embedder) => {
                let features = embed_corpus(embedder, &corpus)?;
                FeatureStore::from_vectors(
                    embedder.name(),
                    corpus_fingerprint(&chunks),
                    features.dim(),
                    features.vectors(),
                )?
                .save(&feature_path)?;
                info!("Saved {} embeddings to {:?}", features.rows(), feature_path);
                Some(features.dim())
            }
            None => {
                // A stale store would no longer line up with the new corpus
                if feature_path.exists() {
                    std::fs::remove_file(&feature_path)?;
                }
                None
            }
        };

        Ok(IndexSummary {
            passages: corpus.len(),
            vocabulary: corpus.lexical().map_or(0, |l| l.space().len()),
            embedding_dim,
        })
    }

    #[inline]
    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    #[inline]
    pub fn into_retriever(self) -> Retriever {
        self.retriever
    }

    #[inline]
    pub fn corpus(&self) -> &Corpus {
        self.retriever.corpus()
    }

    #[inline]
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    #[inline]
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn embed_corpus(embedder: &dyn Embedder, corpus: &Corpus) -> Result<DenseFeatures> {
    let texts: Vec<&str> = corpus.texts().collect();
    let vectors = embedder.embed_batch(&texts)?;
    DenseFeatures::new(embedder.dim(), vectors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftdoc_core::{Error, HashEmbedder, ScoreConversion, ScoringStrategy};

    fn dense_config() -> RetrieverConfig {
        RetrieverConfig {
            strategy: ScoringStrategy::Dense {
                conversion: ScoreConversion::default(),
            },
            ..RetrieverConfig::default()
        }
    }

    #[test]
    fn test_missing_corpus_is_degraded() {
        let dir = tempfile::tempdir().unwrap();
        let kb = KnowledgeBase::open(dir.path(), RetrieverConfig::default(), None).unwrap();
        assert!(kb.is_degraded());
        assert!(kb.retriever().search("door", 2).is_empty());
    }

    #[test]
    fn test_dense_embeddings_created_on_first_open() {
        let dir = tempfile::tempdir().unwrap();
        save_passages(
            dir.path().join(CORPUS_FILE),
            &["Door sensor alignment", "Brake coil inspection"],
        )
        .unwrap();
        let embedder: Arc<dyn Embedder> = Arc::new(HashEmbedder::new(64));

        let kb = KnowledgeBase::open(dir.path(), dense_config(), Some(embedder.clone())).unwrap();
        assert!(dir.path().join(FEATURE_FILE).exists());
        assert_eq!(kb.corpus().dense().unwrap().rows(), 2);

        let results = kb.retriever().search("brake coil", 1);
        assert_eq!(results[0].index, 1);

        // Second open reuses the stored rows
        let reopened = KnowledgeBase::open(dir.path(), dense_config(), Some(embedder)).unwrap();
        assert_eq!(reopened.corpus().dense().unwrap().dim(), 64);
    }

    #[test]
    fn test_dense_without_store_or_embedder_fails() {
        let dir = tempfile::tempdir().unwrap();
        save_passages(dir.path().join(CORPUS_FILE), &["Door sensor"]).unwrap();
        let err = KnowledgeBase::open(dir.path(), dense_config(), None).err().unwrap();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_index_without_embedder_removes_stale_store() {
        let dir = tempfile::tempdir().unwrap();
        let manual = "Door sensor alignment requires 5mm clearance on every landing door panel. ".repeat(10);
        let embedder = HashEmbedder::new(32);

        let summary = KnowledgeBase::index_manual(
            dir.path(),
            &manual,
            &ChunkerConfig::default(),
            Some(&embedder),
        )
        .unwrap();
        assert_eq!(summary.embedding_dim, Some(32));
        assert!(dir.path().join(FEATURE_FILE).exists());

        let summary =
            KnowledgeBase::index_manual(dir.path(), &manual, &ChunkerConfig::default(), None)
                .unwrap();
        assert_eq!(summary.embedding_dim, None);
        assert!(summary.passages >= 1);
        assert!(!dir.path().join(FEATURE_FILE).exists());
    }
}
