//! Command-line driver for the corpus statistics engine.
//!
//! Thin collaborator glue around the library core: tokenizes files from
//! disk (whitespace split, optional lowercasing), wires the directory
//! store, and prints reports. Two source toggles — compute fresh from a
//! document directory, or restore persisted state — plus an optional
//! persist step.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

use corpus_stats::config::{
    DEFAULT_MIN_DOCUMENT_OCCURRENCES, DEFAULT_MIN_GLOBAL_OCCURRENCES, DEFAULT_TOP_TERMS,
};
use corpus_stats::{CorpusStatistics, DirStore, DocumentRecord, FilterConfig};

/// TF-IDF corpus statistics over a directory of tokenized documents
#[derive(Parser)]
#[command(name = "corpus-stats")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["docs", "load"])))]
struct Cli {
    /// Compute fresh statistics from a directory of token files
    /// (one document per file; the file stem is the document name)
    #[arg(long, value_name = "DIR")]
    docs: Option<PathBuf>,

    /// Restore persisted statistics from a store directory
    #[arg(long, value_name = "DIR")]
    load: Option<PathBuf>,

    /// Persist the resulting statistics to a store directory
    #[arg(long, value_name = "DIR")]
    save: Option<PathBuf>,

    /// Lowercase tokens while reading (token normalization is otherwise
    /// the caller's responsibility)
    #[arg(long)]
    lowercase: bool,

    /// Floor for the global count filter
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MIN_GLOBAL_OCCURRENCES)]
    min_global: u64,

    /// Floor for the per-document count filter
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MIN_DOCUMENT_OCCURRENCES)]
    min_doc: u64,

    /// Number of terms in each top-terms report
    #[arg(long, value_name = "K", default_value_t = DEFAULT_TOP_TERMS)]
    top: usize,

    /// Print the cosine similarity of one document pair instead of the
    /// top-terms report
    #[arg(long, value_names = ["DOC_A", "DOC_B"], num_args = 2)]
    compare: Option<Vec<String>>,

    /// Print the documents most similar to one document instead of the
    /// top-terms report
    #[arg(long, value_name = "DOC")]
    similar: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut stats = if let Some(docs_dir) = &cli.docs {
        let records = load_documents(docs_dir, cli.lowercase)?;
        let config = FilterConfig {
            min_global_occurrences: cli.min_global,
            min_document_occurrences: cli.min_doc,
        };
        CorpusStatistics::from_documents(records, &config)?
    } else if let Some(store_dir) = &cli.load {
        CorpusStatistics::load(&DirStore::new(store_dir))
            .with_context(|| format!("failed to restore state from {}", store_dir.display()))?
    } else {
        unreachable!("clap enforces one source toggle");
    };

    stats.compute_tfidf_vectors();

    if let Some(pair) = &cli.compare {
        let score = stats.cosine_similarity(&pair[0], &pair[1])?;
        println!("{score:.6}\t{}\t{}", pair[0], pair[1]);
    } else if let Some(doc_name) = &cli.similar {
        for (name, score) in stats.rank_similar(doc_name, cli.top)? {
            println!("{score:.6}\t{name}");
        }
    } else {
        let names: Vec<String> = stats.document_names().map(str::to_string).collect();
        for name in names {
            println!("# {name}");
            for (term, score) in stats.top_terms(&name, cli.top)? {
                println!("{score:.6}\t{term}");
            }
        }
    }

    if let Some(store_dir) = &cli.save {
        stats
            .save(&DirStore::new(store_dir))
            .with_context(|| format!("failed to persist state to {}", store_dir.display()))?;
    }
    Ok(())
}

/// Read every file directly under `dir` as one document: whitespace
/// tokens, file stem as the document name. Paths are sorted so the
/// ingestion order is reproducible.
fn load_documents(dir: &Path, lowercase: bool) -> Result<Vec<DocumentRecord>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("failed to read document directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read document {}", path.display()))?;
        let tokens: Vec<String> = content
            .split_whitespace()
            .map(|token| {
                if lowercase {
                    token.to_lowercase()
                } else {
                    token.to_string()
                }
            })
            .collect();
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("unknown")
            .to_string();
        records.push(DocumentRecord { name, tokens });
    }
    Ok(records)
}
