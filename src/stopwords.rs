use std::collections::HashSet;
use std::fs;
use std::path::Path;

use stop_words::{LANGUAGE, get};

/// Built-in English stopwords: NLTK's English list from the `stop-words` crate.
/// Entries containing an apostrophe can never match a cleaned token.
pub fn english() -> HashSet<String> {
    get(LANGUAGE::English)
        .iter()
        .map(|s| s.to_lowercase())
        .collect()
}

/// Reads a stopword file: one word per line, `#` starts a comment line.
pub fn load_stopword_file(path: &Path) -> Result<HashSet<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Read stopword file {} failed: {e}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_lowercase)
        .collect())
}

/// Default list (unless disabled) merged with an optional user file.
pub fn build_stopwords(
    extra_file: Option<&Path>,
    use_default: bool,
) -> Result<HashSet<String>, String> {
    let mut set = if use_default {
        english()
    } else {
        HashSet::new()
    };
    if let Some(path) = extra_file {
        set.extend(load_stopword_file(path)?);
    }
    Ok(set)
}
