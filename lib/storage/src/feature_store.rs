// Persisted dense feature matrix, one row per corpus passage
use atomicwrites::{AllowOverwrite, AtomicFile};
use liftdoc_core::{DenseFeatures, Error, Result, Vector};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::Path;

/// Row-major embedding matrix plus the metadata needed to check it still
/// lines up with the corpus file it was built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStore {
    pub rows: usize,
    pub dim: usize,
    /// Name of the embedder that produced the rows
    pub embedder: String,
    /// SHA-256 of the corpus passages the rows were computed from
    pub corpus_sha256: String,
    pub data: Vec<f32>,
}

impl FeatureStore {
    pub fn from_vectors(
        embedder: &str,
        corpus_sha256: String,
        dim: usize,
        vectors: &[Vector],
    ) -> Result<Self> {
        let mut data = Vec::with_capacity(vectors.len() * dim);
        for vector in vectors {
            if vector.dim() != dim {
                return Err(Error::InvalidDimension {
                    expected: dim,
                    actual: vector.dim(),
                });
            }
            data.extend_from_slice(vector.as_slice());
        }

        Ok(Self {
            rows: vectors.len(),
            dim,
            embedder: embedder.to_string(),
            corpus_sha256,
            data,
        })
    }

    /// Load and check the matrix payload matches the declared shape
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        let store: FeatureStore = bincode::deserialize(&bytes)
            .map_err(|e| Error::Serialization(format!("feature store: {}", e)))?;

        let expected = store.rows.checked_mul(store.dim).ok_or_else(|| {
            Error::Serialization(format!(
                "feature store declares an impossible {} x {} matrix",
                store.rows, store.dim
            ))
        })?;
        if store.data.len() != expected {
            return Err(Error::Serialization(format!(
                "feature store declares {} x {} but holds {} values",
                store.rows,
                store.dim,
                store.data.len()
            )));
        }
        Ok(store)
    }

    /// Write atomically, replacing any existing store
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self)
            .map_err(|e| Error::Serialization(format!("feature store: {}", e)))?;
        AtomicFile::new(path.as_ref(), AllowOverwrite)
            .write(|f| f.write_all(&bytes))
            .map_err(|e| match e {
                atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => Error::Io(e),
            })
    }

    /// Convert to corpus features. The row count must equal the passage count;
    /// a mismatch is fatal rather than truncated or padded.
    pub fn into_dense_features(self, passages: usize) -> Result<DenseFeatures> {
        if self.rows != passages {
            return Err(Error::MalformedFeatureStore {
                rows: self.rows,
                passages,
            });
        }
        DenseFeatures::from_row_major(self.rows, self.dim, &self.data)
    }
}

/// Fingerprint of an ordered passage list
pub fn corpus_fingerprint<S: AsRef<str>>(passages: &[S]) -> String {
    let mut hasher = Sha256::new();
    for passage in passages {
        hasher.update(passage.as_ref().as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize, dim: usize) -> Vec<Vector> {
        (0..n)
            .map(|i| Vector::new((0..dim).map(|j| (i * dim + j) as f32).collect()))
            .collect()
    }

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.bin");
        let store = FeatureStore::from_vectors("fixed", "abc".to_string(), 3, &rows(4, 3)).unwrap();
        store.save(&path).unwrap();

        let loaded = FeatureStore::load(&path).unwrap();
        assert_eq!(loaded, store);

        let features = loaded.into_dense_features(4).unwrap();
        assert_eq!(features.rows(), 4);
        assert_eq!(features.vectors()[2].as_slice(), &[6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_row_count_mismatch_is_fatal() {
        let store = FeatureStore::from_vectors("fixed", String::new(), 2, &rows(5, 2)).unwrap();
        let err = store.into_dense_features(4).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedFeatureStore { rows: 5, passages: 4 }
        ));
        assert!(err.to_string().contains("5 rows for 4 passages"));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let vectors = vec![Vector::zeros(2), Vector::zeros(3)];
        assert!(FeatureStore::from_vectors("fixed", String::new(), 2, &vectors).is_err());
    }

    #[test]
    fn test_corrupt_payload_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.bin");
        let mut store = FeatureStore::from_vectors("fixed", String::new(), 2, &rows(2, 2)).unwrap();
        store.data.pop();
        store.save(&path).unwrap();
        assert!(matches!(FeatureStore::load(&path), Err(Error::Serialization(_))));
    }

    #[test]
    fn test_overflowing_shape_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.bin");
        let store = FeatureStore {
            rows: usize::MAX / 2 + 1,
            dim: 2,
            embedder: "fixed".to_string(),
            corpus_sha256: String::new(),
            data: Vec::new(),
        };
        store.save(&path).unwrap();

        let err = FeatureStore::load(&path).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.to_string().contains("impossible"));
    }

    #[test]
    fn test_fingerprint_is_order_sensitive() {
        let a = corpus_fingerprint(&["one", "two"]);
        let b = corpus_fingerprint(&["two", "one"]);
        assert_ne!(a, b);
        assert_eq!(a, corpus_fingerprint(&["one".to_string(), "two".to_string()]));
        assert_eq!(a.len(), 64);
    }
}
