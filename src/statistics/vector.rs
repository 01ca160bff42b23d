use ahash::RandomState;
use indexmap::IndexMap;

use super::error::{StatsError, StatsResult};

/// Maximum number of entries a document vector retains after ranking.
pub const VECTOR_CAP: usize = 2000;

/// A TF-IDF weighted document vector.
/// Entries are held in descending weight order, truncated to
/// [`VECTOR_CAP`] terms at construction. Weights are non-negative.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TfIdfVector {
    weights: IndexMap<String, f64, RandomState>,
}

impl TfIdfVector {
    /// Rank scored terms and keep the top [`VECTOR_CAP`] entries.
    /// Sort is descending by weight; ties break on ascending term so the
    /// result is deterministic for identical input.
    pub fn from_scored(mut scored: Vec<(String, f64)>) -> Self {
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored.truncate(VECTOR_CAP);
        TfIdfVector {
            weights: scored.into_iter().collect(),
        }
    }

    /// Euclidean norm of all weights
    #[inline]
    pub fn norm(&self) -> f64 {
        self.weights.values().map(|w| w * w).sum::<f64>().sqrt()
    }

    /// Return a copy with every weight divided by the Euclidean norm
    ///
    /// # Errors
    /// * [`StatsError::ZeroVectorNorm`] - the vector is empty or all-zero
    pub fn normalized(&self) -> StatsResult<TfIdfVector> {
        let norm = self.norm();
        if norm == 0.0 {
            return Err(StatsError::ZeroVectorNorm);
        }
        Ok(TfIdfVector {
            weights: self
                .weights
                .iter()
                .map(|(term, &w)| (term.clone(), w / norm))
                .collect(),
        })
    }

    /// Dot product restricted to the intersection of term sets.
    /// Iterates the smaller side; terms absent from one vector contribute 0.
    pub fn dot(&self, other: &TfIdfVector) -> f64 {
        let (small, large) = if self.weights.len() <= other.weights.len() {
            (&self.weights, &other.weights)
        } else {
            (&other.weights, &self.weights)
        };
        small
            .iter()
            .filter_map(|(term, &w)| large.get(term).map(|&ow| w * ow))
            .sum()
    }

    /// Cosine similarity with another vector
    /// cosθ = A・B / (|A||B|), computed over normalized copies
    ///
    /// # Errors
    /// * [`StatsError::ZeroVectorNorm`] - either side is a zero vector
    pub fn cosine_similarity(&self, other: &TfIdfVector) -> StatsResult<f64> {
        Ok(self.normalized()?.dot(&other.normalized()?))
    }

    /// Get the `k` highest-weight `(term, score)` pairs, descending.
    /// Read-only view over the already-ranked entries.
    pub fn top_terms(&self, k: usize) -> Vec<(&str, f64)> {
        self.weights
            .iter()
            .take(k)
            .map(|(term, &w)| (term.as_str(), w))
            .collect()
    }

    /// Number of retained terms
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Check if the vector retains no terms
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
