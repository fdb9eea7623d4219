//! Persistence of calibrated [`Weights`].
//!
//! Weights are stored as a JSON array `[lines, height, holes, bumpiness]`. Loading never has
//! to be fatal: [`WeightStore::load_or`] falls back to caller-supplied weights and reports
//! why through [`WeightSource`]. Saving always overwrites the file.

use std::{
    fs::{self, File},
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use crate::weights::Weights;

/// Default file name of the weight store.
pub const DEFAULT_WEIGHTS_FILE: &str = "ai_weights.json";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum WeightStoreError {
    #[display("failed to access weights file {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("failed to parse weights file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("failed to encode weights for {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl WeightStoreError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Where the weights returned by [`WeightStore::load_or`] came from.
#[derive(Debug, derive_more::IsVariant)]
pub enum WeightSource {
    /// Read from the store.
    Stored,
    /// The store file does not exist; defaults were used.
    Missing,
    /// The store file could not be read or parsed; defaults were used.
    Fallback(WeightStoreError),
}

#[derive(Debug)]
pub struct LoadedWeights {
    pub weights: Weights,
    pub source: WeightSource,
}

/// File-backed store for one weight vector.
///
/// # Example
///
/// ```
/// use blockfall_evaluator::{weight_store::WeightStore, weights::Weights};
///
/// let dir = tempfile::tempdir().unwrap();
/// let store = WeightStore::new(dir.path().join("weights.json"));
///
/// let loaded = store.load_or(Weights::DEFAULT);
/// assert!(loaded.source.is_missing());
/// assert_eq!(loaded.weights, Weights::DEFAULT);
///
/// let tuned = Weights::new(0.7, -0.4, -1.1, -0.2);
/// store.save(&tuned).unwrap();
/// assert_eq!(store.load().unwrap(), tuned);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightStore {
    path: PathBuf,
}

impl WeightStore {
    #[must_use]
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Weights, WeightStoreError> {
        let file = File::open(&self.path).map_err(|source| self.io_error(source))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| WeightStoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Loads the stored weights, or returns `defaults` when the store is missing or unreadable.
    ///
    /// An unreadable store is logged as a warning.
    pub fn load_or(&self, defaults: Weights) -> LoadedWeights {
        match self.load() {
            Ok(weights) => LoadedWeights {
                weights,
                source: WeightSource::Stored,
            },
            Err(e) if e.is_not_found() => {
                log::debug!("no weights file at {}, using defaults", self.path.display());
                LoadedWeights {
                    weights: defaults,
                    source: WeightSource::Missing,
                }
            }
            Err(e) => {
                log::warn!("{e}; falling back to default weights");
                LoadedWeights {
                    weights: defaults,
                    source: WeightSource::Fallback(e),
                }
            }
        }
    }

    /// Writes `weights`, replacing whatever the store held.
    pub fn save(&self, weights: &Weights) -> Result<(), WeightStoreError> {
        let mut json = serde_json::to_vec(weights).map_err(|source| WeightStoreError::Encode {
            path: self.path.clone(),
            source,
        })?;
        json.push(b'\n');
        fs::write(&self.path, json).map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: io::Error) -> WeightStoreError {
        WeightStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = WeightStore::new(dir.path().join(DEFAULT_WEIGHTS_FILE));
        let weights = Weights::new(1.25, -0.75, -2.0, -0.125);
        store.save(&weights).unwrap();

        let loaded = store.load_or(Weights::DEFAULT);
        assert!(loaded.source.is_stored());
        assert_eq!(loaded.weights, weights);
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "[1.25,-0.75,-2.0,-0.125]\n"
        );
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.json");
        fs::write(&path, b"\x80\x03garbage").unwrap();
        let store = WeightStore::new(&path);

        assert!(matches!(store.load(), Err(WeightStoreError::Parse { .. })));
        let defaults = Weights::new(3.0, -3.0, -3.0, -3.0);
        let loaded = store.load_or(defaults);
        assert_eq!(loaded.weights, defaults);
        assert!(matches!(loaded.source, WeightSource::Fallback(WeightStoreError::Parse { .. })));
    }

    #[test]
    fn test_wrong_arity_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.json");
        fs::write(&path, "[1.0, 2.0, 3.0]").unwrap();
        let loaded = WeightStore::new(&path).load_or(Weights::DEFAULT);
        assert_eq!(loaded.weights, Weights::DEFAULT);
        assert!(loaded.source.is_fallback());
    }

    #[test]
    fn test_missing_file_is_not_an_error_source() {
        let dir = tempfile::tempdir().unwrap();
        let store = WeightStore::new(dir.path().join("absent.json"));
        let err = store.load().unwrap_err();
        assert!(err.is_not_found());
        assert!(store.load_or(Weights::DEFAULT).source.is_missing());
    }

    #[test]
    fn test_save_failure_is_reported_as_io() {
        let dir = tempfile::tempdir().unwrap();
        let store = WeightStore::new(dir.path().join("missing-dir").join("weights.json"));
        let err = store.save(&Weights::DEFAULT).unwrap_err();
        assert!(matches!(err, WeightStoreError::Io { .. }));
        assert!(err.to_string().starts_with("failed to access weights file"));
    }

    #[test]
    fn test_encode_error_message_names_encoding() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let err = WeightStoreError::Encode {
            path: PathBuf::from("weights.json"),
            source,
        };
        assert!(err.to_string().starts_with("failed to encode weights for weights.json"));
    }

    #[test]
    fn test_save_overwrites_unconditionally() {
        let dir = tempfile::tempdir().unwrap();
        let store = WeightStore::new(dir.path().join("weights.json"));
        store.save(&Weights::new(9.0, 0.0, 0.0, 0.0)).unwrap();
        let worse = Weights::new(-9.0, 9.0, 9.0, 9.0);
        store.save(&worse).unwrap();
        assert_eq!(store.load().unwrap(), worse);
    }
}
