//! Association measures over n-gram contingency tables.
//!
//! Cells of a contingency table are indexed by a bit mask: bit `k` set means
//! position `k` holds some *other* word than the n-gram's. Cell `0` is the
//! n-gram itself.

use clap::ValueEnum;
use serde::Serialize;

use crate::ngrams::{Marginals, NgramTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    /// Pointwise mutual information
    Pmi,
    /// Pearson's chi-square
    ChiSq,
    /// Relative frequency of the n-gram
    RawFreq,
}

impl Measure {
    pub fn score(self, m: &Marginals) -> f64 {
        match self {
            Measure::Pmi => pmi(m),
            Measure::ChiSq => chi_sq(m),
            Measure::RawFreq => raw_freq(m),
        }
    }

    /// Name used in the printed summary.
    pub fn label(self) -> &'static str {
        match self {
            Measure::Pmi => "PMI",
            Measure::ChiSq => "Chi Square",
            Measure::RawFreq => "Raw Frequency",
        }
    }

    /// Name used in export file names.
    pub fn slug(self) -> &'static str {
        match self {
            Measure::Pmi => "pmi",
            Measure::ChiSq => "chi_sq",
            Measure::RawFreq => "raw_freq",
        }
    }
}

/// `log2(P(ngram) / prod P(w_i))` with maximum-likelihood estimates over `N` tokens.
pub fn pmi(m: &Marginals) -> f64 {
    let n = m.unigrams.len() as f64;
    (m.count as f64).log2() + (n - 1.0) * (m.total as f64).log2()
        - m.unigrams.iter().map(|&u| (u as f64).log2()).sum::<f64>()
}

pub fn raw_freq(m: &Marginals) -> f64 {
    if m.total == 0 {
        return 0.0;
    }
    m.count as f64 / m.total as f64
}

/// Observed contingency table, derived from the marginals by inclusion-exclusion.
pub fn contingency(m: &Marginals) -> Vec<f64> {
    let n = m.unigrams.len();
    let full = (1usize << n) - 1;
    (0..=full)
        .map(|out| {
            let inside = full & !out;
            let mut cell = 0i64;
            let mut t = out;
            loop {
                let term = m.joint(inside | t) as i64;
                if t.count_ones() % 2 == 0 {
                    cell += term;
                } else {
                    cell -= term;
                }
                if t == 0 {
                    break;
                }
                t = (t - 1) & out;
            }
            cell as f64
        })
        .collect()
}

/// Expected cell counts if all positions were independent.
pub fn expected_values(m: &Marginals) -> Vec<f64> {
    let n = m.unigrams.len();
    let total = m.total as f64;
    let scale = total.powi(n as i32 - 1);
    (0..(1usize << n))
        .map(|cell| {
            let product: f64 = m
                .unigrams
                .iter()
                .enumerate()
                .map(|(k, &u)| {
                    if cell & (1 << k) != 0 {
                        total - u as f64
                    } else {
                        u as f64
                    }
                })
                .product();
            if scale == 0.0 { 0.0 } else { product / scale }
        })
        .collect()
}

/// Pearson's chi-square over the full `2^n` table. A table with an empty row
/// or column total scores 0.
pub fn chi_sq(m: &Marginals) -> f64 {
    let expected = expected_values(m);
    if expected.iter().any(|&e| e <= 0.0) {
        return 0.0;
    }
    contingency(m)
        .iter()
        .zip(expected.iter())
        .map(|(o, e)| (o - e).powi(2) / e)
        .sum()
}

/// One n-gram with its count and score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredNgram {
    pub ngram: Vec<String>,
    pub count: u64,
    pub score: f64,
}

impl ScoredNgram {
    pub fn joined(&self) -> String {
        self.ngram.join(" ")
    }
}

/// Scores every n-gram, highest first. Equal scores keep first-occurrence order.
pub fn score_ngrams(table: &NgramTable, measure: Measure) -> Vec<ScoredNgram> {
    let mut scored: Vec<ScoredNgram> = table
        .iter()
        .map(|(g, count)| ScoredNgram {
            ngram: g.to_vec(),
            count,
            score: measure.score(&table.marginals(g)),
        })
        .collect();
    // stable: ties stay in table order
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Top `k` n-grams under `measure`.
pub fn nbest(table: &NgramTable, measure: Measure, k: usize) -> Vec<Vec<String>> {
    score_ngrams(table, measure)
        .into_iter()
        .take(k)
        .map(|s| s.ngram)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn bigram(count: u64, u1: u64, u2: u64, total: u64) -> Marginals {
        Marginals {
            count,
            pairs: Vec::new(),
            unigrams: vec![u1, u2],
            total,
        }
    }

    #[test]
    fn pmi_matches_closed_form() {
        let m = bigram(2, 2, 2, 6);
        assert!(approx(pmi(&m), 3f64.log2()));
        let m = bigram(1, 2, 2, 6);
        assert!(approx(pmi(&m), 1.5f64.log2()));
    }

    #[test]
    fn bigram_chi_sq_matches_two_by_two_formula() {
        for &(c, u1, u2, total) in &[(2, 2, 2, 6), (3, 5, 4, 20), (1, 7, 2, 30)] {
            let m = bigram(c, u1, u2, total);
            let (ii, io, oi) = (c as f64, (u1 - c) as f64, (u2 - c) as f64);
            let n = total as f64;
            let oo = n - ii - io - oi;
            let closed = n * (ii * oo - io * oi).powi(2)
                / ((ii + io) * (ii + oi) * (io + oo) * (oi + oo));
            assert!(approx(chi_sq(&m), closed), "{c} {u1} {u2} {total}");
        }
    }

    #[test]
    fn contingency_cells_sum_to_total() {
        let m = Marginals {
            count: 2,
            pairs: vec![2, 3, 2],
            unigrams: vec![3, 2, 3],
            total: 9,
        };
        let cells = contingency(&m);
        assert_eq!(cells.len(), 8);
        assert_eq!(cells[0], 2.0);
        // x y ? with ? != z
        assert_eq!(cells[0b100], 0.0);
        // x ? z with ? != y
        assert_eq!(cells[0b010], 1.0);
        assert_eq!(cells.iter().sum::<f64>(), 9.0);
        assert!(approx(expected_values(&m).iter().sum::<f64>(), 9.0));
        assert!(chi_sq(&m) > 0.0);
    }

    #[test]
    fn degenerate_table_scores_zero() {
        // corpus "a a a": every token is the same word
        let m = bigram(2, 3, 3, 3);
        assert_eq!(chi_sq(&m), 0.0);
    }

    #[test]
    fn raw_freq_is_relative_count() {
        assert!(approx(raw_freq(&bigram(3, 4, 4, 12)), 0.25));
        assert_eq!(raw_freq(&bigram(0, 0, 0, 0)), 0.0);
    }

    #[test]
    fn ties_break_by_first_occurrence() {
        let t = NgramTable::new(&toks("a b a b c d"), 2).unwrap();
        let ranked = score_ngrams(&t, Measure::Pmi);
        let order: Vec<String> = ranked.iter().map(ScoredNgram::joined).collect();
        // "a b" and "b c" share PMI log2(3); "a b" is seen first
        assert_eq!(order, vec!["c d", "a b", "b c", "b a"]);
        assert!(approx(ranked[1].score, ranked[2].score));
    }

    #[test]
    fn nbest_truncates() {
        let t = NgramTable::new(&toks("a b a b c d"), 2).unwrap();
        assert_eq!(nbest(&t, Measure::RawFreq, 1), vec![toks("a b")]);
        assert_eq!(nbest(&t, Measure::ChiSq, 10).len(), 4);
    }

    #[test]
    fn trigram_scores_from_table() {
        let t = NgramTable::new(&toks("x y z x y z x q z"), 3).unwrap();
        let ranked = score_ngrams(&t, Measure::Pmi);
        let xyz = ranked
            .iter()
            .find(|s| s.ngram == toks("x y z"))
            .unwrap();
        // 2 * 9^2 / (3 * 2 * 3)
        assert!(approx(xyz.score, 9f64.log2()));
        assert_eq!(xyz.count, 2);

        let chi = score_ngrams(&t, Measure::ChiSq);
        assert_eq!(chi.len(), t.len());
        assert!(chi.iter().all(|s| s.score >= 0.0));
    }
}
