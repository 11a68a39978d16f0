//! N-gram frequency tables.
//!
//! A table counts every contiguous n-gram of a token stream together with the
//! unigram counts and, for trigrams, the pair counts needed to rebuild the
//! full contingency table of an n-gram.

use std::collections::HashMap;

/// Observed counts around one n-gram.
#[derive(Debug, Clone, PartialEq)]
pub struct Marginals {
    /// Occurrences of the n-gram itself.
    pub count: u64,
    /// Trigrams only: `c(w1 w2)`, `c(w1 _ w3)`, `c(w2 w3)`.
    pub pairs: Vec<u64>,
    /// `c(w_k)` for every position.
    pub unigrams: Vec<u64>,
    /// Total number of tokens.
    pub total: u64,
}

impl Marginals {
    /// Number of windows in which every position in `mask` (bit k = position k)
    /// holds its word of the n-gram.
    pub fn joint(&self, mask: usize) -> u64 {
        let n = self.unigrams.len();
        let full = (1usize << n) - 1;
        if mask == full {
            return self.count;
        }
        match (mask.count_ones(), mask) {
            (0, _) => self.total,
            (1, _) => self.unigrams[mask.trailing_zeros() as usize],
            (_, 0b011) => self.pairs[0],
            (_, 0b101) => self.pairs[1],
            (_, 0b110) => self.pairs[2],
            _ => 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NgramTable {
    n: usize,
    total: u64,
    word_fd: HashMap<String, u64>,
    /// n-grams in order of first occurrence
    ngrams: Vec<(Vec<String>, u64)>,
    index: HashMap<Vec<String>, usize>,
    pair_fd: HashMap<(String, String), u64>,
    gap_fd: HashMap<(String, String), u64>,
}

impl NgramTable {
    /// Counts all contiguous n-grams of `tokens`. Only bigrams and trigrams are supported.
    pub fn new(tokens: &[String], n: usize) -> Result<Self, String> {
        if !(2..=3).contains(&n) {
            return Err(format!("Unsupported n-gram size {n}: expected 2 or 3"));
        }
        let mut table = NgramTable {
            n,
            total: tokens.len() as u64,
            word_fd: HashMap::new(),
            ngrams: Vec::new(),
            index: HashMap::new(),
            pair_fd: HashMap::new(),
            gap_fd: HashMap::new(),
        };

        for word in tokens {
            *table.word_fd.entry(word.to_owned()).or_insert(0) += 1;
        }
        for window in tokens.windows(n) {
            match table.index.get(window) {
                Some(&i) => table.ngrams[i].1 += 1,
                None => {
                    table.index.insert(window.to_vec(), table.ngrams.len());
                    table.ngrams.push((window.to_vec(), 1));
                }
            }
        }
        if n == 3 {
            for pair in tokens.windows(2) {
                *table
                    .pair_fd
                    .entry((pair[0].clone(), pair[1].clone()))
                    .or_insert(0) += 1;
            }
            for triple in tokens.windows(3) {
                *table
                    .gap_fd
                    .entry((triple[0].clone(), triple[2].clone()))
                    .or_insert(0) += 1;
            }
        }
        Ok(table)
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.ngrams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ngrams.is_empty()
    }

    pub fn word_count(&self, word: &str) -> u64 {
        self.word_fd.get(word).copied().unwrap_or(0)
    }

    pub fn count(&self, ngram: &[String]) -> u64 {
        self.index
            .get(ngram)
            .map(|&i| self.ngrams[i].1)
            .unwrap_or(0)
    }

    /// N-grams with their counts, first occurrence first.
    pub fn iter(&self) -> impl Iterator<Item = (&[String], u64)> {
        self.ngrams.iter().map(|(g, c)| (g.as_slice(), *c))
    }

    /// Drops n-grams seen fewer than `min_freq` times. Unigram counts are untouched.
    pub fn apply_freq_filter(&mut self, min_freq: u64) {
        self.ngrams.retain(|(_, c)| *c >= min_freq);
        self.index = self
            .ngrams
            .iter()
            .enumerate()
            .map(|(i, (g, _))| (g.clone(), i))
            .collect();
    }

    pub fn marginals(&self, ngram: &[String]) -> Marginals {
        let pair = |fd: &HashMap<(String, String), u64>, a: &String, b: &String| {
            fd.get(&(a.clone(), b.clone())).copied().unwrap_or(0)
        };
        let pairs = if self.n == 3 {
            vec![
                pair(&self.pair_fd, &ngram[0], &ngram[1]),
                pair(&self.gap_fd, &ngram[0], &ngram[2]),
                pair(&self.pair_fd, &ngram[1], &ngram[2]),
            ]
        } else {
            Vec::new()
        };
        Marginals {
            count: self.count(ngram),
            pairs,
            unigrams: ngram.iter().map(|w| self.word_count(w)).collect(),
            total: self.total,
        }
    }
}
