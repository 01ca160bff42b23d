/// This crate is a TF-IDF corpus statistics and document similarity engine.
pub mod config;
pub mod statistics;
pub mod store;

/// Corpus Statistics
/// The top-level struct of this crate. It ingests a batch of tokenized
/// documents, maintains global and per-document word-frequency counts with
/// frequency-floor filtering, derives TF / DF / IDF / TF-IDF scores, and
/// supports per-document vector construction, cosine similarity and
/// top-term reporting.
///
/// The instance is built once from a fixed document set and is read-mostly
/// afterwards; only the explicit vector pass mutates document state.
///
/// # Serialization
/// Supported through the persistence contract in [`store`]: three named
/// artifacts ("documents", "word_counts", "word_counts_by_document")
/// exchanged with any [`store::ArtifactStore`].
pub use statistics::CorpusStatistics;

/// Document ingestion record
/// The contract value supplied by the tokenizing collaborator: a unique
/// document name plus its ordered, pre-normalized token sequence.
pub use statistics::document::DocumentRecord;

/// Sparse term counter
/// Term occurrence counts with default-zero reads: absent terms read as 0
/// without being inserted, so read-only queries never grow the map.
/// Serializes as materialized (term, count) pairs only.
pub use statistics::counts::TermCounts;

/// TF-IDF weighted document vector
/// Descending-weight term→weight entries, truncated to the top 2000 at
/// construction. Provides Euclidean normalization, intersection dot
/// product, cosine similarity and the top-terms report view.
pub use statistics::vector::TfIdfVector;

/// Frequency-floor configuration
/// The two independent floors applied after count accumulation
/// (corpus-wide rare-term pruning and per-document noise pruning).
pub use config::FilterConfig;

/// Error taxonomy of the statistics core
/// Precondition, domain and not-found failures, surfaced fail-fast; see
/// [`statistics::error::ErrorKind`] for the classification.
pub use statistics::error::{ErrorKind, StatsError, StatsResult};

/// Artifact persistence collaborator
/// Directory-backed store mapping each contract artifact to a CBOR file.
pub use store::{ArtifactStore, DirStore, StoreError};
