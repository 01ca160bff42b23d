use serde::{Deserialize, Serialize};

use super::vector::TfIdfVector;

/// A single ingested document as supplied by the tokenizing collaborator.
/// `name` is the unique key within a corpus; `tokens` arrive already
/// normalized (case, punctuation splitting) by the caller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    pub name: String,
    pub tokens: Vec<String>,
}

impl DocumentRecord {
    /// Create a record from a name and a token sequence
    pub fn new<T>(name: &str, tokens: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        DocumentRecord {
            name: name.to_string(),
            tokens: tokens.iter().map(|t| t.as_ref().to_string()).collect(),
        }
    }
}

/// A document owned by the corpus.
/// The TF-IDF vector is absent until the vector pass has run.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub tokens: Vec<String>,
    pub(crate) tfidf_vector: Option<TfIdfVector>,
}

impl Document {
    pub(crate) fn from_record(record: DocumentRecord) -> Self {
        Document {
            name: record.name,
            tokens: record.tokens,
            tfidf_vector: None,
        }
    }

    /// Get the computed TF-IDF vector, if the vector pass has run
    #[inline]
    pub fn tfidf_vector(&self) -> Option<&TfIdfVector> {
        self.tfidf_vector.as_ref()
    }

    /// Turn the document back into its ingestion record
    pub(crate) fn to_record(&self) -> DocumentRecord {
        DocumentRecord {
            name: self.name.clone(),
            tokens: self.tokens.clone(),
        }
    }
}
