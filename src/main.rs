#![forbid(unsafe_code)]
//! # Collocations CLI
//!
//! Command-line interface for the `collocations` crate. Point it at a
//! directory of plaintext files and it prints the strongest bigram and
//! trigram collocations by PMI and chi-square.
//!
//! ## Example
//! ```bash
//! cargo run --release -- data --top-k 10 --measure pmi --ngram 2 --export-format csv
//! ```
//!
//! See `--help` for all available options.

use clap::Parser;
use collocations::{AnalysisOptions, ExportFormat, Measure, analyze_path, print_failed_files};
use log::error;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Corpus directory (or a single file)
    path: PathBuf,

    /// Number of n-grams to show per ranking
    #[arg(long, default_value_t = 5)]
    top_k: usize,

    /// Ignore n-grams seen fewer than this many times
    #[arg(long, default_value_t = 1)]
    min_freq: u64,

    /// N-gram size (2 or 3); repeat for both
    #[arg(long = "ngram", value_parser = clap::value_parser!(u8).range(2..=3))]
    ngrams: Vec<u8>,

    /// Association measure; repeat for several
    #[arg(long = "measure", value_enum)]
    measures: Vec<Measure>,

    /// Regex a file path relative to the corpus root must match
    #[arg(long, default_value = ".*")]
    pattern: String,

    /// Optional path to additional stopword file (.txt, one word per line)
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// Do not use the built-in English stopword list
    #[arg(long, default_value_t = false)]
    no_default_stopwords: bool,

    /// Also write the full rankings to files (txt, csv, tsv, json)
    #[arg(long)]
    export_format: Option<ExportFormat>,

    /// Directory export files are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

impl Cli {
    fn options(&self) -> AnalysisOptions {
        let defaults = AnalysisOptions::default();
        AnalysisOptions {
            top_k: self.top_k,
            min_freq: self.min_freq,
            orders: if self.ngrams.is_empty() {
                defaults.orders
            } else {
                self.ngrams.iter().map(|&n| n as usize).collect()
            },
            measures: if self.measures.is_empty() {
                defaults.measures
            } else {
                self.measures.clone()
            },
            pattern: self.pattern.clone(),
            stopwords_file: self.stopwords.clone(),
            default_stopwords: !self.no_default_stopwords,
            export_format: self.export_format,
            out_dir: self.out_dir.clone(),
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match analyze_path(&cli.path, &cli.options()) {
        Ok(report) => {
            println!("Files:\n{}\n", report.file_ids.join("\n"));
            println!("{}", report.summary);
            for path in &report.exported {
                println!("Exported {}", path.display());
            }
            if !report.failed_files.is_empty() {
                print_failed_files(&report.failed_files);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Error: {}", e);
            process::exit(1);
        }
    }
}
