//! # collocations
//!
//! Ranks bigram and trigram collocations of a plaintext corpus by statistical
//! association strength.
//!
//! The pipeline is: read every file below a directory, split it into words,
//! clean the words (ASCII alphanumerics only, lowercased, stopwords and
//! numbers dropped), count n-grams, score them and keep the best `k`.
//!
//! ## Example
//! ```
//! use collocations::{AnalysisOptions, analyze_words, Measure};
//! let tokens: Vec<String> = "new york pizza new york bagel"
//!     .split_whitespace()
//!     .map(String::from)
//!     .collect();
//! let opts = AnalysisOptions { min_freq: 2, ..AnalysisOptions::default() };
//! let analysis = analyze_words(&tokens, &opts).unwrap();
//! let pmi = analysis.ranking(2, Measure::Pmi).unwrap();
//! assert_eq!(pmi.scored[0].joined(), "new york");
//! assert_eq!(pmi.scored.len(), 1);
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{info, warn};

pub mod corpus;
pub mod export;
pub mod measures;
pub mod ngrams;
pub mod normalize;
pub mod stopwords;

pub use corpus::{Corpus, collect_files, file_ids, read_corpus, word_tokenize};
pub use export::{ExportFormat, csv_safe_cell, export_rankings};
pub use measures::{Measure, ScoredNgram, nbest, score_ngrams};
pub use ngrams::{Marginals, NgramTable};
pub use normalize::{clean_token, is_digits, normalize_tokens};
pub use stopwords::build_stopwords;

/// Everything a run can be configured with.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Number of n-grams kept per ranking.
    pub top_k: usize,
    /// N-grams seen fewer times are not ranked.
    pub min_freq: u64,
    /// N-gram sizes, each 2 or 3.
    pub orders: Vec<usize>,
    pub measures: Vec<Measure>,
    /// Regex a file id must fully match.
    pub pattern: String,
    pub stopwords_file: Option<PathBuf>,
    pub default_stopwords: bool,
    pub export_format: Option<ExportFormat>,
    pub out_dir: PathBuf,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            top_k: 5,
            min_freq: 1,
            orders: vec![2, 3],
            measures: vec![Measure::Pmi, Measure::ChiSq],
            pattern: ".*".to_string(),
            stopwords_file: None,
            default_stopwords: true,
            export_format: None,
            out_dir: PathBuf::from("."),
        }
    }
}

/// All n-grams of one size, ranked under one measure.
#[derive(Debug, Clone)]
pub struct Ranking {
    pub n: usize,
    pub measure: Measure,
    pub scored: Vec<ScoredNgram>,
}

impl Ranking {
    pub fn kind(&self) -> &'static str {
        match self.n {
            2 => "Bigram",
            3 => "Trigram",
            _ => "Ngram",
        }
    }

    pub fn top(&self, k: usize) -> &[ScoredNgram] {
        &self.scored[..k.min(self.scored.len())]
    }
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub token_count: usize,
    pub rankings: Vec<Ranking>,
}

impl Analysis {
    pub fn ranking(&self, n: usize, measure: Measure) -> Option<&Ranking> {
        self.rankings
            .iter()
            .find(|r| r.n == n && r.measure == measure)
    }
}

/// Outcome of [`analyze_path`].
#[derive(Debug)]
pub struct Report {
    pub summary: String,
    pub analysis: Analysis,
    pub file_ids: Vec<String>,
    pub failed_files: Vec<(String, String)>,
    pub exported: Vec<PathBuf>,
}

/// Drops repeated entries, keeping the first of each.
fn first_seen<T: Copy + PartialEq>(items: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for &item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Ranks the n-grams of an already normalized token stream.
/// Every (order, measure) pair is ranked once, even if listed twice.
pub fn analyze_words(tokens: &[String], opts: &AnalysisOptions) -> Result<Analysis, String> {
    let orders = first_seen(&opts.orders);
    let measures = first_seen(&opts.measures);
    let mut rankings = Vec::with_capacity(orders.len() * measures.len());
    for &n in &orders {
        let mut table = NgramTable::new(tokens, n)?;
        if opts.min_freq > 1 {
            table.apply_freq_filter(opts.min_freq);
        }
        if table.is_empty() {
            warn!("No {n}-grams to score");
        }
        for &measure in &measures {
            rankings.push(Ranking {
                n,
                measure,
                scored: score_ngrams(&table, measure),
            });
        }
    }
    Ok(Analysis {
        token_count: tokens.len(),
        rankings,
    })
}

///Human readable report of the best `top_k` n-grams of every ranking.
pub fn format_summary(analysis: &Analysis, top_k: usize) -> String {
    let mut out = format!("Tokens after filtering: {}\n", analysis.token_count);
    for ranking in &analysis.rankings {
        out.push_str(&format!(
            "\nTop {} {}s by {} score:\n",
            top_k,
            ranking.kind(),
            ranking.measure.label()
        ));
        let top = ranking.top(top_k);
        if top.is_empty() {
            out.push_str("  (none)\n");
        }
        for s in top {
            out.push_str(&format!(
                "  ({})  count={}  score={:.4}\n",
                s.ngram.join(", "),
                s.count,
                s.score
            ));
        }
    }
    out
}

/// Reads the corpus at `root`, normalizes it and ranks its collocations.
/// Exports the full rankings when `opts.export_format` is set.
pub fn analyze_path(root: &Path, opts: &AnalysisOptions) -> Result<Report, String> {
    let stopwords: HashSet<String> =
        build_stopwords(opts.stopwords_file.as_deref(), opts.default_stopwords)?;
    let corpus = read_corpus(root, &opts.pattern)?;
    for id in &corpus.file_ids {
        info!("Corpus file: {id}");
    }

    let tokens = normalize_tokens(&corpus.words, &stopwords);
    if tokens.is_empty() {
        return Err(format!(
            "Empty corpus: no tokens left in {} after filtering",
            root.display()
        ));
    }
    info!(
        "{} of {} words kept after filtering",
        tokens.len(),
        corpus.words.len()
    );

    let analysis = analyze_words(&tokens, opts)?;
    let summary = format_summary(&analysis, opts.top_k);

    let exported = match opts.export_format {
        Some(format) => {
            // a directory keeps its full name, a single file loses its extension
            let name = if root.is_file() {
                root.file_stem()
            } else {
                root.file_name()
            };
            let stem = name
                .map(|s| s.to_string_lossy().into_owned())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "corpus".to_string());
            export_rankings(&analysis.rankings, &stem, format, &opts.out_dir)?
        }
        None => Vec::new(),
    };

    Ok(Report {
        summary,
        analysis,
        file_ids: corpus.file_ids,
        failed_files: corpus.failed_files,
        exported,
    })
}

/// Lists files that could not be read on stderr.
pub fn print_failed_files(failed: &[(String, String)]) {
    eprintln!("\nThe following files could not be read:");
    for (file, reason) in failed {
        eprintln!("  {file}: {reason}");
    }
}
