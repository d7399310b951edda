//! Text embedding seam for the dense scoring strategy
//!
//! Real deployments plug an external model in behind [`Embedder`].
//! [`HashEmbedder`] is a deterministic feature-hashing embedder that needs no
//! model files, so dense retrieval works out of the box.

use crate::{Result, Vector};
use xxhash_rust::xxh3::xxh3_64;

/// Default dimension for hashed embeddings
pub const DEFAULT_EMBEDDING_DIM: usize = 256;

pub trait Embedder: Send + Sync {
    /// Identifier persisted alongside stored embeddings
    fn name(&self) -> &str;

    fn dim(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vector>;

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

/// Feature-hashing embedder over character trigrams and whole words
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
    name: String,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        let dim = dim.max(1);
        Self {
            dim,
            name: format!("xxh3-trigram-{}", dim),
        }
    }

    /// Bucket for a feature. Must not change between builds: stored
    /// feature rows are compared against fresh query embeddings.
    #[inline]
    fn slot(&self, item: &str) -> usize {
        (xxh3_64(item.as_bytes()) % self.dim as u64) as usize
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIM)
    }
}

impl Embedder for HashEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Result<Vector> {
        let mut vector = Vector::zeros(self.dim);
        let normalized = text.to_lowercase();

        for word in normalized
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let chars: Vec<char> = format!(" {} ", word).chars().collect();
            for window in chars.windows(3) {
                let trigram: String = window.iter().collect();
                let pos = self.slot(&trigram);
                vector.as_mut_slice()[pos] += 1.0;
            }

            // Words contribute more than their trigrams
            let pos = self.slot(word);
            vector.as_mut_slice()[pos] += 2.0;
        }

        vector.normalize();
        Ok(vector)
    }
}
