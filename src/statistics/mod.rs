pub mod counts;
pub mod document;
pub mod error;
pub mod vector;

use ahash::RandomState;
use indexmap::IndexMap;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::FilterConfig;

use self::counts::TermCounts;
use self::document::{Document, DocumentRecord};
use self::error::{StatsError, StatsResult};
use self::vector::TfIdfVector;

/// Corpus-wide TF-IDF statistics over a fixed set of documents.
///
/// Built once from a batch of [`DocumentRecord`]s: counts are accumulated,
/// the two frequency floors are applied, and the instance is read-mostly
/// from then on. The only later mutation is [`compute_tfidf_vectors`],
/// which decorates every document with its ranked vector and must run
/// before any similarity or reporting call.
///
/// All state is instance-owned; nothing is shared between instances.
///
/// [`compute_tfidf_vectors`]: CorpusStatistics::compute_tfidf_vectors
#[derive(Debug, Clone, Default)]
pub struct CorpusStatistics {
    documents: IndexMap<String, Document, RandomState>,
    word_counts: TermCounts,
    word_counts_by_document: IndexMap<String, TermCounts, RandomState>,
}

/// Construction and the counting/filtering pass
impl CorpusStatistics {
    /// Build statistics from a batch of ingested records.
    ///
    /// Accumulates global and per-document counts over the records in
    /// input order, then applies the two independent frequency floors
    /// from `config`. Each floor runs over the unfiltered counts and
    /// neither consults the other's result, so a term may survive
    /// globally while pruned from a specific document and vice versa.
    /// TF and DF read the two maps independently; the divergence is part
    /// of the model, not repaired here.
    ///
    /// # Arguments
    /// * `records` - ingestion batch; tokens already normalized by the caller
    /// * `config` - frequency floors for the filtering pass
    ///
    /// # Errors
    /// * [`StatsError::DuplicateDocument`] - two records share a name
    pub fn from_documents(
        records: Vec<DocumentRecord>,
        config: &FilterConfig,
    ) -> StatsResult<Self> {
        debug!(documents = records.len(), "accumulating corpus counts");

        let mut stats = CorpusStatistics::default();
        for record in records {
            if stats.documents.contains_key(&record.name) {
                return Err(StatsError::DuplicateDocument(record.name));
            }
            let mut doc_counts = TermCounts::new();
            for token in &record.tokens {
                stats.word_counts.add_term(token);
                doc_counts.add_term(token);
            }
            stats
                .word_counts_by_document
                .insert(record.name.clone(), doc_counts);
            stats
                .documents
                .insert(record.name.clone(), Document::from_record(record));
        }

        let pruned_global = stats
            .word_counts
            .retain_at_least(config.min_global_occurrences);
        let mut pruned_doc_occurrences = 0;
        for doc_counts in stats.word_counts_by_document.values_mut() {
            pruned_doc_occurrences +=
                doc_counts.retain_at_least(config.min_document_occurrences);
        }

        info!(
            documents = stats.documents.len(),
            vocab = stats.word_counts.term_num(),
            pruned_global,
            pruned_doc_occurrences,
            "corpus statistics built"
        );
        Ok(stats)
    }

    /// Rebuild an instance from persisted parts, applying no filtering.
    pub(crate) fn from_parts(
        records: Vec<DocumentRecord>,
        word_counts: TermCounts,
        word_counts_by_document: IndexMap<String, TermCounts, RandomState>,
    ) -> Self {
        let documents = records
            .into_iter()
            .map(|record| (record.name.clone(), Document::from_record(record)))
            .collect();
        CorpusStatistics {
            documents,
            word_counts,
            word_counts_by_document,
        }
    }
}

/// TF / DF / IDF scoring
impl CorpusStatistics {
    /// Log-dampened term frequency: 0 for a zero count, else `1 + log10(c)`
    #[inline]
    fn tf_calc(count: u64) -> f64 {
        if count == 0 {
            return 0.0;
        }
        1.0 + (count as f64).log10()
    }

    /// Log-scaled rarity: `log10(doc_num / df)`, caller guarantees df > 0
    #[inline]
    fn idf_calc(doc_num: usize, df: usize) -> f64 {
        (doc_num as f64 / df as f64).log10()
    }

    /// Term frequency of `term` within one document, post-filter.
    /// A term absent from the document's filtered counts scores 0.
    ///
    /// # Errors
    /// * [`StatsError::DocumentNotFound`] - unknown document name
    pub fn tf(&self, doc_name: &str, term: &str) -> StatsResult<f64> {
        let counts = self.document_counts(doc_name)?;
        Ok(Self::tf_calc(counts.count(term)))
    }

    /// Number of documents whose post-filter count for `term` is above 0
    pub fn df(&self, term: &str) -> usize {
        self.word_counts_by_document
            .values()
            .filter(|counts| counts.count(term) > 0)
            .count()
    }

    /// Inverse document frequency of `term`.
    ///
    /// # Errors
    /// * [`StatsError::ZeroDocumentFrequency`] - no document contains the
    ///   term; `log10(N / 0)` is undefined and is never defaulted to 0
    pub fn idf(&self, term: &str) -> StatsResult<f64> {
        let df = self.df(term);
        if df == 0 {
            return Err(StatsError::ZeroDocumentFrequency(term.to_string()));
        }
        Ok(Self::idf_calc(self.documents.len(), df))
    }

    /// Combined TF-IDF weight of `term` within one document
    ///
    /// # Errors
    /// Propagates [`tf`](CorpusStatistics::tf) and
    /// [`idf`](CorpusStatistics::idf) failures.
    pub fn tfidf(&self, doc_name: &str, term: &str) -> StatsResult<f64> {
        Ok(self.tf(doc_name, term)? * self.idf(term)?)
    }
}

/// Vector construction and similarity
impl CorpusStatistics {
    /// Score every document's filtered terms and store the ranked,
    /// truncated vector on the document.
    ///
    /// Documents are independent, so the pass runs in parallel over
    /// documents with the count maps read-only. Document frequencies are
    /// materialized once up front; every term reaching the scoring loop
    /// appears in at least one per-document map, so its df is >= 1.
    ///
    /// Must be called once after construction and before any similarity
    /// or reporting operation.
    pub fn compute_tfidf_vectors(&mut self) {
        let doc_num = self.documents.len();
        let mut doc_freqs: HashMap<&str, usize, RandomState> = HashMap::default();
        for doc_counts in self.word_counts_by_document.values() {
            for term in doc_counts.term_set_iter() {
                *doc_freqs.entry(term).or_insert(0) += 1;
            }
        }

        let vectors: Vec<(String, TfIdfVector)> = self
            .word_counts_by_document
            .par_iter()
            .map(|(name, doc_counts)| {
                let scored: Vec<(String, f64)> = doc_counts
                    .iter()
                    .map(|(term, count)| {
                        let tf = Self::tf_calc(count);
                        let idf = Self::idf_calc(doc_num, doc_freqs[term]);
                        (term.to_string(), tf * idf)
                    })
                    .collect();
                (name.clone(), TfIdfVector::from_scored(scored))
            })
            .collect();

        for (name, vector) in vectors {
            if let Some(doc) = self.documents.get_mut(&name) {
                doc.tfidf_vector = Some(vector);
            }
        }
        info!(documents = doc_num, "tf-idf vectors computed");
    }

    /// Cosine similarity between two documents' vectors.
    ///
    /// Both vectors are normalized and the dot product is restricted to
    /// the intersection of their term sets. Range is [0, 1] since every
    /// weight is non-negative.
    ///
    /// # Errors
    /// * [`StatsError::DocumentNotFound`] - either name is unknown
    /// * [`StatsError::VectorNotComputed`] - the vector pass has not run
    /// * [`StatsError::ZeroVectorNorm`] - either document kept no
    ///   positively-weighted term after filtering
    pub fn cosine_similarity(&self, doc_a: &str, doc_b: &str) -> StatsResult<f64> {
        let vec_a = self.vector_of(doc_a)?;
        let vec_b = self.vector_of(doc_b)?;
        vec_a.cosine_similarity(vec_b)
    }

    /// Get the `k` highest-weight `(term, score)` pairs of one document,
    /// descending. Read-only; formatting is the caller's concern.
    ///
    /// # Errors
    /// Same lookup failures as
    /// [`cosine_similarity`](CorpusStatistics::cosine_similarity).
    pub fn top_terms(&self, doc_name: &str, k: usize) -> StatsResult<Vec<(&str, f64)>> {
        Ok(self.vector_of(doc_name)?.top_terms(k))
    }

    /// Rank every other document by cosine similarity against `doc_name`
    /// and return the top `k` as `(name, score)`, descending.
    ///
    /// Documents whose vectors carry no weight (everything filtered away
    /// or weighted 0) have no signal to compare against and are skipped.
    ///
    /// # Errors
    /// * lookup failures as in
    ///   [`cosine_similarity`](CorpusStatistics::cosine_similarity)
    /// * [`StatsError::ZeroVectorNorm`] - the queried document itself has
    ///   a zero vector
    pub fn rank_similar(&self, doc_name: &str, k: usize) -> StatsResult<Vec<(String, f64)>> {
        let base = self.vector_of(doc_name)?.normalized()?;

        let mut hits: Vec<(String, f64)> = self
            .documents
            .par_iter()
            .filter(|(name, _)| name.as_str() != doc_name)
            .filter_map(|(name, doc)| {
                let vector = doc.tfidf_vector()?;
                match vector.normalized() {
                    Ok(normalized) => Some((name.clone(), base.dot(&normalized))),
                    Err(_) => {
                        debug!(document = %name, "skipping zero-weight vector");
                        None
                    }
                }
            })
            .collect();

        hits.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        hits.truncate(k);
        Ok(hits)
    }

    fn vector_of(&self, doc_name: &str) -> StatsResult<&TfIdfVector> {
        self.get_document(doc_name)
            .ok_or_else(|| StatsError::DocumentNotFound(doc_name.to_string()))?
            .tfidf_vector()
            .ok_or_else(|| StatsError::VectorNotComputed(doc_name.to_string()))
    }
}

/// Read accessors
impl CorpusStatistics {
    /// Number of documents in the corpus
    #[inline]
    pub fn doc_num(&self) -> usize {
        self.documents.len()
    }

    /// Number of unique terms surviving the global filter
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.word_counts.term_num()
    }

    /// Check if a document with the given name exists
    #[inline]
    pub fn contains_document(&self, doc_name: &str) -> bool {
        self.documents.contains_key(doc_name)
    }

    /// Get a document by name
    #[inline]
    pub fn get_document(&self, doc_name: &str) -> Option<&Document> {
        self.documents.get(doc_name)
    }

    /// Iterate document names in ingestion order
    #[inline]
    pub fn document_names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(|s| s.as_str())
    }

    /// Get the global post-filter count map
    #[inline]
    pub fn global_counts(&self) -> &TermCounts {
        &self.word_counts
    }

    /// Get one document's post-filter count map
    ///
    /// # Errors
    /// * [`StatsError::DocumentNotFound`] - unknown document name
    pub fn document_counts(&self, doc_name: &str) -> StatsResult<&TermCounts> {
        self.word_counts_by_document
            .get(doc_name)
            .ok_or_else(|| StatsError::DocumentNotFound(doc_name.to_string()))
    }

    pub(crate) fn records(&self) -> Vec<DocumentRecord> {
        self.documents.values().map(|doc| doc.to_record()).collect()
    }

    pub(crate) fn word_counts(&self) -> &TermCounts {
        &self.word_counts
    }

    pub(crate) fn word_counts_by_document(
        &self,
    ) -> &IndexMap<String, TermCounts, RandomState> {
        &self.word_counts_by_document
    }
}

#[cfg(test)]
mod tests {
    use super::error::ErrorKind;
    use super::*;

    const TOL: f64 = 1e-9;
    // looser tolerance for the hand-computed literals
    const LIT_TOL: f64 = 1e-4;

    fn record(name: &str, tokens: &[&str]) -> DocumentRecord {
        DocumentRecord::new(name, tokens)
    }

    /// doc1/doc2/doc3 corpus with both floors disabled
    fn literal_corpus() -> CorpusStatistics {
        CorpusStatistics::from_documents(
            vec![
                record("doc1", &["hello", "world", "this"]),
                record("doc2", &["hello", "shanghai"]),
                record("doc3", &["hello", "world", "thiss"]),
            ],
            &FilterConfig::disabled(),
        )
        .unwrap()
    }

    #[test]
    fn literal_scenario_tf_df_idf_tfidf() {
        let stats = literal_corpus();

        assert!((stats.tf("doc1", "world").unwrap() - 1.0).abs() < TOL);
        assert_eq!(stats.df("world"), 2);
        assert!((stats.idf("world").unwrap() - 0.1761).abs() < LIT_TOL);
        assert!((stats.tfidf("doc1", "world").unwrap() - 0.1761).abs() < LIT_TOL);

        assert_eq!(stats.df("shanghai"), 1);
        assert!((stats.idf("shanghai").unwrap() - 0.4771).abs() < LIT_TOL);
        assert!((stats.tf("doc2", "shanghai").unwrap() - 1.0).abs() < TOL);
        assert!((stats.tfidf("doc2", "shanghai").unwrap() - 0.4771).abs() < LIT_TOL);

        // a term in every document carries no rarity signal
        assert_eq!(stats.df("hello"), 3);
        assert!(stats.idf("hello").unwrap().abs() < TOL);
    }

    #[test]
    fn tf_is_monotone_in_count_and_zero_iff_absent() {
        let stats = CorpusStatistics::from_documents(
            vec![record("doc", &["a", "a", "a", "b", "b", "c"])],
            &FilterConfig::disabled(),
        )
        .unwrap();

        let tf_a = stats.tf("doc", "a").unwrap();
        let tf_b = stats.tf("doc", "b").unwrap();
        let tf_c = stats.tf("doc", "c").unwrap();
        assert!(tf_a > tf_b && tf_b > tf_c && tf_c > 0.0);
        assert_eq!(stats.tf("doc", "absent").unwrap(), 0.0);
    }

    #[test]
    fn rarer_terms_score_higher_idf() {
        let stats = literal_corpus();
        // df: shanghai 1 < world 2 < hello 3
        let idf_shanghai = stats.idf("shanghai").unwrap();
        let idf_world = stats.idf("world").unwrap();
        let idf_hello = stats.idf("hello").unwrap();
        assert!(idf_shanghai > idf_world);
        assert!(idf_world > idf_hello);
    }

    #[test]
    fn idf_of_a_term_in_no_document_is_a_domain_error() {
        let stats = literal_corpus();
        let err = stats.idf("nowhere").unwrap_err();
        assert_eq!(err, StatsError::ZeroDocumentFrequency("nowhere".into()));
        assert_eq!(err.kind(), ErrorKind::Domain);
    }

    #[test]
    fn duplicate_document_names_are_rejected() {
        let err = CorpusStatistics::from_documents(
            vec![record("dup", &["a"]), record("dup", &["b"])],
            &FilterConfig::disabled(),
        )
        .unwrap_err();
        assert_eq!(err, StatsError::DuplicateDocument("dup".into()));
        assert_eq!(err.kind(), ErrorKind::Precondition);
    }

    #[test]
    fn unknown_document_is_not_found() {
        let stats = literal_corpus();
        let err = stats.tf("doc9", "hello").unwrap_err();
        assert_eq!(err, StatsError::DocumentNotFound("doc9".into()));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn vector_access_before_the_pass_is_a_precondition_error() {
        let stats = literal_corpus();
        let err = stats.top_terms("doc1", 10).unwrap_err();
        assert_eq!(err, StatsError::VectorNotComputed("doc1".into()));
        assert_eq!(err.kind(), ErrorKind::Precondition);
        assert_eq!(
            stats.cosine_similarity("doc1", "doc2").unwrap_err().kind(),
            ErrorKind::Precondition
        );
        assert!(stats.get_document("doc1").unwrap().tfidf_vector().is_none());
    }

    #[test]
    fn global_and_document_filters_diverge() {
        // Unfiltered: global x=5 y=3; docA x=4 y=2; docB x=1; docC y=1.
        // Global floor 5 keeps x, drops y. Document floor 2 keeps docA's
        // x and y, drops docB's x and docC's y. Each filter ran over the
        // unfiltered counts, so the two maps disagree on purpose.
        let stats = CorpusStatistics::from_documents(
            vec![
                record("docA", &["x", "x", "x", "x", "y", "y"]),
                record("docB", &["x"]),
                record("docC", &["y"]),
            ],
            &FilterConfig {
                min_global_occurrences: 5,
                min_document_occurrences: 2,
            },
        )
        .unwrap();

        // y was pruned globally yet survives inside docA
        assert_eq!(stats.global_counts().count("y"), 0);
        assert_eq!(stats.document_counts("docA").unwrap().count("y"), 2);

        // x survives globally yet was pruned from docB
        assert_eq!(stats.global_counts().count("x"), 5);
        assert_eq!(stats.document_counts("docB").unwrap().count("x"), 0);

        // df reads the per-document side only
        assert_eq!(stats.df("x"), 1);
        assert_eq!(stats.df("y"), 1);
        assert_eq!(stats.vocab_size(), 1);
    }

    #[test]
    fn vectors_rank_truncate_and_report_top_terms() {
        let mut stats = literal_corpus();
        stats.compute_tfidf_vectors();

        let top = stats.top_terms("doc1", 2).unwrap();
        assert_eq!(top.len(), 2);
        // "this" (df 1) outweighs "world" (df 2); "hello" scores 0
        assert_eq!(top[0].0, "this");
        assert_eq!(top[1].0, "world");
        assert!(top[0].1 > top[1].1);

        let all = stats.top_terms("doc1", 50).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all[2].1.abs() < TOL); // hello
    }

    #[test]
    fn cosine_is_bounded_and_one_on_self() {
        let mut stats = literal_corpus();
        stats.compute_tfidf_vectors();

        for a in ["doc1", "doc2", "doc3"] {
            for b in ["doc1", "doc2", "doc3"] {
                let sim = stats.cosine_similarity(a, b).unwrap();
                assert!((-TOL..=1.0 + TOL).contains(&sim), "sim({a},{b}) = {sim}");
            }
            assert!((stats.cosine_similarity(a, a).unwrap() - 1.0).abs() < TOL);
        }

        // doc1 and doc3 share "world"; doc2 shares nothing with positive
        // weight with doc1
        let near = stats.cosine_similarity("doc1", "doc3").unwrap();
        let far = stats.cosine_similarity("doc1", "doc2").unwrap();
        assert!(near > far);
        assert!(far.abs() < TOL);
    }

    #[test]
    fn fully_filtered_document_yields_a_zero_vector_domain_error() {
        // with the default floors every term in this tiny corpus is pruned
        let mut stats = CorpusStatistics::from_documents(
            vec![record("lonely", &["once"]), record("other", &["twice"])],
            &FilterConfig::default(),
        )
        .unwrap();
        stats.compute_tfidf_vectors();

        let vector = stats.get_document("lonely").unwrap().tfidf_vector().unwrap();
        assert!(vector.is_empty());

        let err = stats.cosine_similarity("lonely", "other").unwrap_err();
        assert_eq!(err, StatsError::ZeroVectorNorm);
        assert_eq!(err.kind(), ErrorKind::Domain);
    }

    #[test]
    fn rank_similar_orders_by_cosine_and_skips_empty_vectors() {
        let mut stats = CorpusStatistics::from_documents(
            vec![
                record("base", &["rust", "fast", "parallel"]),
                record("close", &["rust", "fast", "safe"]),
                record("far", &["cooking", "recipes", "rust"]),
                record("empty", &[] as &[&str]),
            ],
            &FilterConfig::disabled(),
        )
        .unwrap();
        stats.compute_tfidf_vectors();

        let hits = stats.rank_similar("base", 10).unwrap();
        assert_eq!(hits.len(), 2); // "empty" skipped
        assert_eq!(hits[0].0, "close");
        assert_eq!(hits[1].0, "far");
        assert!(hits[0].1 >= hits[1].1);

        // querying the signal-less document itself fails fast
        assert_eq!(
            stats.rank_similar("empty", 10).unwrap_err(),
            StatsError::ZeroVectorNorm
        );
    }
}
