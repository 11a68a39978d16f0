//! Reading a plaintext corpus from disk.
//!
//! A corpus is a root directory plus a file-id pattern. File ids are paths
//! relative to the root with `/` separators; every regular file whose id
//! fully matches the pattern takes part, in lexical id order.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::{info, warn};
use regex::Regex;
use walkdir::WalkDir;

static WORD_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+|[^\w\s]+").expect("static regex"));

/// Raw words read from a corpus, before any cleaning.
#[derive(Debug, Default)]
pub struct Corpus {
    /// Every matched file, in reading order, including the ones that failed.
    pub file_ids: Vec<String>,
    pub words: Vec<String>,
    /// Matched files that could not be read and entries the directory walk
    /// could not visit, with the reason.
    pub failed_files: Vec<(String, String)>,
}

/// Splits text into runs of word characters and runs of punctuation.
/// # Example
/// ```
/// use collocations::word_tokenize;
/// assert_eq!(word_tokenize("Don't stop."), vec!["Don", "'", "t", "stop", "."]);
/// ```
pub fn word_tokenize(text: &str) -> Vec<&str> {
    WORD_PUNCT.find_iter(text).map(|m| m.as_str()).collect()
}

fn file_id(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let id = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if id.is_empty() {
        // root itself is the file
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        id
    }
}

/// Matching files plus the entries the walk could not visit.
fn walk_corpus(
    root: &Path,
    pattern: &str,
) -> Result<(Vec<PathBuf>, Vec<(String, String)>), String> {
    if !root.exists() {
        return Err(format!("File not found: {}", root.display()));
    }
    let re = Regex::new(&format!("^(?:{pattern})$"))
        .map_err(|e| format!("Invalid file pattern {pattern:?}: {e}"))?;

    let mut files: Vec<(String, PathBuf)> = Vec::new();
    let mut failed: Vec<(String, String)> = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                let p = entry.into_path();
                let id = file_id(root, &p);
                if re.is_match(&id) {
                    files.push((id, p));
                }
            }
            Ok(_) => {}
            Err(err) => {
                // reported whatever the pattern: a broken directory may hide matches
                let id = err
                    .path()
                    .map(|p| file_id(root, p))
                    .unwrap_or_else(|| root.display().to_string());
                warn!("Skipping unreadable entry {id}: {err}");
                failed.push((id, err.to_string()));
            }
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok((files.into_iter().map(|(_, p)| p).collect(), failed))
}

/// Collects all regular files below `root` whose file id fully matches `pattern`.
/// Entries the walk cannot visit are logged and left out.
pub fn collect_files(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, String> {
    walk_corpus(root, pattern).map(|(files, _)| files)
}

/// File ids for `files`, relative to `root`.
pub fn file_ids(root: &Path, files: &[PathBuf]) -> Vec<String> {
    files.iter().map(|p| file_id(root, p)).collect()
}

/// Reads every matching file and concatenates their words in file-id order.
/// Every matched file is listed in `file_ids`, read or not; files that fail to
/// read and entries the walk could not visit end up in `failed_files`.
pub fn read_corpus(root: &Path, pattern: &str) -> Result<Corpus, String> {
    let (files, walk_failures) = walk_corpus(root, pattern)?;
    if files.is_empty() {
        return Err(format!(
            "No files matching {pattern:?} found in {}",
            root.display()
        ));
    }

    let mut corpus = Corpus {
        file_ids: file_ids(root, &files),
        words: Vec::new(),
        failed_files: walk_failures,
    };
    let mut read = 0;
    for (id, path) in corpus.file_ids.iter().zip(files.iter()) {
        match fs::read(path) {
            Ok(bytes) => {
                read += 1;
                let text = String::from_utf8_lossy(&bytes);
                corpus
                    .words
                    .extend(word_tokenize(&text).into_iter().map(String::from));
            }
            Err(e) => {
                warn!("Skipping {id}: {e}");
                corpus.failed_files.push((id.clone(), e.to_string()));
            }
        }
    }
    info!(
        "Read {} words from {} of {} file(s)",
        corpus.words.len(),
        read,
        corpus.file_ids.len()
    );
    Ok(corpus)
}
