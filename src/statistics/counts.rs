use ahash::RandomState;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// TermCounts struct
/// Sparse term occurrence counter with default-zero reads.
/// Absent terms read as 0 and are never inserted by a lookup,
/// so read-only queries cannot grow the map.
///
/// # Examples
/// ```
/// use corpus_stats::statistics::counts::TermCounts;
/// let mut counts = TermCounts::new();
/// counts.add_term("term1");
/// counts.add_term("term2");
/// counts.add_term("term1");
///
/// assert_eq!(counts.count("term1"), 2);
/// assert_eq!(counts.count("missing"), 0);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TermCounts {
    #[serde(with = "indexmap::map::serde_seq")]
    term_count: IndexMap<String, u64, RandomState>,
    total_term_count: u64,
}

/// Implementation for adding and removing terms
impl TermCounts {
    /// Create a new TermCounts
    pub fn new() -> Self {
        TermCounts {
            term_count: IndexMap::with_hasher(RandomState::new()),
            total_term_count: 0,
        }
    }

    /// Add one occurrence of a term
    ///
    /// # Arguments
    /// * `term` - term to add
    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        let count = self.term_count.entry(term.to_string()).or_insert(0);
        *count += 1;
        self.total_term_count += 1;
        self
    }

    /// Add one occurrence of each term in a slice
    ///
    /// # Arguments
    /// * `terms` - Slice of terms to add
    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }

    /// Remove every term whose count is below the floor
    /// A floor of 0 or 1 removes nothing (every stored count is >= 1)
    ///
    /// # Arguments
    /// * `floor` - minimum count a term needs to survive
    ///
    /// # Returns
    /// * `u64` - Total count of removed occurrences
    #[inline]
    pub fn retain_at_least(&mut self, floor: u64) -> u64 {
        let mut removed_total_count: u64 = 0;
        self.term_count.retain(|_, count| {
            if *count < floor {
                removed_total_count += *count;
                false
            } else {
                true
            }
        });
        self.total_term_count -= removed_total_count;
        removed_total_count
    }
}

/// Implementation for retrieving information from TermCounts
impl TermCounts {
    /// Get the occurrence count for a term, 0 if absent
    ///
    /// # Arguments
    /// * `term` - term
    ///
    /// # Returns
    /// * `u64` - Occurrence count for the term
    #[inline]
    pub fn count(&self, term: &str) -> u64 {
        self.term_count.get(term).copied().unwrap_or(0)
    }

    /// Check if a term is materialized in the counter
    ///
    /// # Arguments
    /// * `term` - term
    ///
    /// # Returns
    /// * `bool` - true if the term has a stored count
    #[inline]
    pub fn contains_term(&self, term: &str) -> bool {
        self.term_count.contains_key(term)
    }

    /// Get iterator over all terms and their counts
    ///
    /// # Returns
    /// * `impl Iterator<Item=(&str, u64)>` - Iterator over terms and their counts
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.term_count.iter().map(|(term, &count)| (term.as_str(), count))
    }

    /// Get iterator over the set of materialized terms
    ///
    /// # Returns
    /// * `impl Iterator<Item=&str>` - Iterator over terms
    #[inline]
    pub fn term_set_iter(&self) -> impl Iterator<Item = &str> {
        self.term_count.keys().map(|s| s.as_str())
    }

    /// Get the number of unique terms
    ///
    /// # Returns
    /// * `usize` - Number of unique terms
    #[inline]
    pub fn term_num(&self) -> usize {
        self.term_count.len()
    }

    /// Get the total count of all occurrences
    ///
    /// # Returns
    /// * `u64` - Total occurrence count
    #[inline]
    pub fn term_sum(&self) -> u64 {
        self.total_term_count
    }

    /// Check if no term is materialized
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.term_count.is_empty()
    }
}
