//! Persistence collaborator for [`CorpusStatistics`].
//!
//! The core's state is exchanged with storage as three named artifacts:
//! [`DOCUMENTS`], [`WORD_COUNTS`] and [`WORD_COUNTS_BY_DOCUMENT`].
//! Saving persists the count maps exactly as filtered; restoring
//! reproduces them verbatim with no re-filtering and with every document
//! vector reset to unbuilt. Persistence only ever happens through an
//! explicit [`CorpusStatistics::save`] call.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ahash::RandomState;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::info;

use crate::statistics::counts::TermCounts;
use crate::statistics::document::DocumentRecord;
use crate::statistics::CorpusStatistics;

/// Artifact holding the ingested document records.
pub const DOCUMENTS: &str = "documents";
/// Artifact holding the global post-filter count map.
pub const WORD_COUNTS: &str = "word_counts";
/// Artifact holding the per-document post-filter count maps.
pub const WORD_COUNTS_BY_DOCUMENT: &str = "word_counts_by_document";

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while exchanging artifacts with storage.
/// These are collaborator failures, not part of the core taxonomy.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying filesystem failure.
    #[error("artifact i/o error: {0}")]
    Io(#[from] io::Error),

    /// CBOR encode/decode failure.
    #[error("artifact codec error: {0}")]
    Codec(#[from] serde_cbor::Error),

    /// A contract artifact is absent from the store.
    #[error("missing artifact: {0}")]
    MissingArtifact(String),
}

/// A store of named byte artifacts.
pub trait ArtifactStore {
    /// Write one artifact, replacing any previous content.
    fn write(&self, name: &str, bytes: &[u8]) -> StoreResult<()>;

    /// Read one artifact.
    ///
    /// # Errors
    /// * [`StoreError::MissingArtifact`] - no artifact with that name
    fn read(&self, name: &str) -> StoreResult<Vec<u8>>;
}

/// Directory-backed artifact store: each artifact maps to
/// `<root>/<name>.cbor`.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Create a store rooted at `root`. The directory is created on the
    /// first write.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        DirStore {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn artifact_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.cbor"))
    }
}

impl ArtifactStore for DirStore {
    fn write(&self, name: &str, bytes: &[u8]) -> StoreResult<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.artifact_path(name), bytes)?;
        Ok(())
    }

    fn read(&self, name: &str) -> StoreResult<Vec<u8>> {
        match fs::read(self.artifact_path(name)) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::MissingArtifact(name.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Saving and restoring against an [`ArtifactStore`]
impl CorpusStatistics {
    /// Persist the document records and both count maps.
    /// The maps are written exactly as filtered at save time; only
    /// materialized (term, count) pairs reach the encoding.
    pub fn save<S: ArtifactStore>(&self, store: &S) -> StoreResult<()> {
        store.write(DOCUMENTS, &serde_cbor::to_vec(&self.records())?)?;
        store.write(WORD_COUNTS, &serde_cbor::to_vec(self.word_counts())?)?;
        store.write(
            WORD_COUNTS_BY_DOCUMENT,
            &serde_cbor::to_vec(self.word_counts_by_document())?,
        )?;
        info!(documents = self.doc_num(), "corpus statistics saved");
        Ok(())
    }

    /// Restore an instance from the three contract artifacts.
    /// The count maps are adopted verbatim — any filtering applied before
    /// the save is already baked in and is not re-applied. Every document
    /// vector starts unbuilt; run
    /// [`compute_tfidf_vectors`](CorpusStatistics::compute_tfidf_vectors)
    /// before similarity or reporting.
    pub fn load<S: ArtifactStore>(store: &S) -> StoreResult<CorpusStatistics> {
        let records: Vec<DocumentRecord> =
            serde_cbor::from_slice(&store.read(DOCUMENTS)?)?;
        let word_counts: TermCounts = serde_cbor::from_slice(&store.read(WORD_COUNTS)?)?;
        let word_counts_by_document: IndexMap<String, TermCounts, RandomState> =
            serde_cbor::from_slice(&store.read(WORD_COUNTS_BY_DOCUMENT)?)?;

        let stats =
            CorpusStatistics::from_parts(records, word_counts, word_counts_by_document);
        info!(documents = stats.doc_num(), "corpus statistics restored");
        Ok(stats)
    }
}
