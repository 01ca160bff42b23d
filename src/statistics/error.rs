//! Error types for the statistics core.
//!
//! Every variant is a programmer-error-class failure surfaced immediately
//! to the caller; domain errors are never defaulted to zero scores.
//! Persistence failures live in [`crate::store::StoreError`].

use thiserror::Error;

/// Result type alias for statistics operations.
pub type StatsResult<T> = Result<T, StatsError>;

/// Coarse classification of a [`StatsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An operation was invoked before its stated prerequisite.
    Precondition,
    /// A score is mathematically undefined for the given input.
    Domain,
    /// A document name is not present in the corpus.
    NotFound,
}

/// Errors that can occur during statistics operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// Two ingested records share a document name.
    #[error("duplicate document name: {0}")]
    DuplicateDocument(String),

    /// Vector read or similarity requested before the vector pass ran.
    #[error("tf-idf vector for document '{0}' has not been computed")]
    VectorNotComputed(String),

    /// idf requested for a term no document contains.
    #[error("term '{0}' has zero document frequency, idf is undefined")]
    ZeroDocumentFrequency(String),

    /// Normalization requested for a zero-magnitude (or empty) vector.
    #[error("cannot normalize a vector with zero Euclidean norm")]
    ZeroVectorNorm,

    /// Document name not present in the corpus.
    #[error("document not found: {0}")]
    DocumentNotFound(String),
}

impl StatsError {
    /// Classify the error within the core taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StatsError::DuplicateDocument(_) | StatsError::VectorNotComputed(_) => {
                ErrorKind::Precondition
            }
            StatsError::ZeroDocumentFrequency(_) | StatsError::ZeroVectorNorm => ErrorKind::Domain,
            StatsError::DocumentNotFound(_) => ErrorKind::NotFound,
        }
    }
}
