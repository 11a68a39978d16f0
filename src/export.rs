use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::prelude::*;
use clap::ValueEnum;
use csv::WriterBuilder;
use log::info;
use serde::Serialize;

use crate::Ranking;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Txt,
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Serialize)]
struct Row {
    rank: usize,
    ngram: String,
    count: u64,
    score: f64,
}

fn rows(ranking: &Ranking) -> Vec<Row> {
    ranking
        .scored
        .iter()
        .enumerate()
        .map(|(i, s)| Row {
            rank: i + 1,
            ngram: s.joined(),
            count: s.count,
            score: s.score,
        })
        .collect()
}

///Neutralizes cells a spreadsheet would evaluate as a formula by prefixing `'`.
/// # Example
/// ```
/// use collocations::csv_safe_cell;
/// assert_eq!(csv_safe_cell("=SUM(A1)".to_string()), "'=SUM(A1)");
/// assert_eq!(csv_safe_cell("new york".to_string()), "new york");
/// ```
pub fn csv_safe_cell(cell: String) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell,
    }
}

fn write_delimited(path: &Path, ranking: &Ranking, delimiter: u8) -> Result<(), String> {
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| format!("Create {} failed: {e}", path.display()))?;
    wtr.write_record(["rank", "ngram", "count", "score"])
        .map_err(|e| format!("Write {} failed: {e}", path.display()))?;
    for row in rows(ranking) {
        wtr.write_record([
            row.rank.to_string(),
            csv_safe_cell(row.ngram),
            row.count.to_string(),
            row.score.to_string(),
        ])
        .map_err(|e| format!("Write {} failed: {e}", path.display()))?;
    }
    wtr.flush()
        .map_err(|e| format!("Write {} failed: {e}", path.display()))
}

fn write_json(path: &Path, ranking: &Ranking) -> Result<(), String> {
    let file = File::create(path).map_err(|e| format!("Create {} failed: {e}", path.display()))?;
    serde_json::to_writer_pretty(file, &rows(ranking))
        .map_err(|e| format!("Write {} failed: {e}", path.display()))
}

fn write_txt(path: &Path, ranking: &Ranking) -> Result<(), String> {
    let mut out = format!(
        "{} ranked by {} ({} entries)\n",
        ranking.kind(),
        ranking.measure.label(),
        ranking.scored.len()
    );
    for row in rows(ranking) {
        out.push_str(&format!(
            "{:>5}  {:<40}  count={:<6}  score={:.6}\n",
            row.rank, row.ngram, row.count, row.score
        ));
    }
    let mut file =
        File::create(path).map_err(|e| format!("Create {} failed: {e}", path.display()))?;
    file.write_all(out.as_bytes())
        .map_err(|e| format!("Write {} failed: {e}", path.display()))
}

/// Writes one file per ranking into `out_dir`, named
/// `<stem>_<YYYYMMDD_HHMMSS>_<bigram|trigram>_<measure>.<ext>`.
pub fn export_rankings(
    rankings: &[Ranking],
    stem: &str,
    format: ExportFormat,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, String> {
    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let mut written = Vec::with_capacity(rankings.len());
    for ranking in rankings {
        let name = format!(
            "{stem}_{stamp}_{}_{}.{}",
            ranking.kind().to_lowercase(),
            ranking.measure.slug(),
            format.extension()
        );
        let path = out_dir.join(name);
        match format {
            ExportFormat::Txt => write_txt(&path, ranking)?,
            ExportFormat::Csv => write_delimited(&path, ranking, b',')?,
            ExportFormat::Tsv => write_delimited(&path, ranking, b'\t')?,
            ExportFormat::Json => write_json(&path, ranking)?,
        }
        info!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measures::{Measure, ScoredNgram};

    fn ranking() -> Ranking {
        Ranking {
            n: 2,
            measure: Measure::Pmi,
            scored: vec![
                ScoredNgram {
                    ngram: vec!["new".into(), "york".into()],
                    count: 3,
                    score: 4.5,
                },
                ScoredNgram {
                    ngram: vec!["-dash".into(), "word".into()],
                    count: 1,
                    score: 1.25,
                },
            ],
        }
    }

    #[test]
    fn safe_cell_does_not_double_prefix() {
        assert_eq!(csv_safe_cell("'@SAFE".to_string()), "'@SAFE");
        assert_eq!(csv_safe_cell("-x".to_string()), "'-x");
        assert_eq!(csv_safe_cell(String::new()), "");
    }

    #[test]
    fn csv_and_json_exports() {
        let dir = tempfile::tempdir().unwrap();
        let r = [ranking()];

        let csv = export_rankings(&r, "corpus", ExportFormat::Csv, dir.path()).unwrap();
        assert_eq!(csv.len(), 1);
        let name = csv[0].file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("corpus_"));
        assert!(name.ends_with("_bigram_pmi.csv"));
        let content = std::fs::read_to_string(&csv[0]).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("rank,ngram,count,score"));
        assert_eq!(lines.next(), Some("1,new york,3,4.5"));
        assert_eq!(lines.next(), Some("2,'-dash word,1,1.25"));

        let json = export_rankings(&r, "corpus", ExportFormat::Json, dir.path()).unwrap();
        let v: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json[0]).unwrap()).unwrap();
        let arr = v.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["ngram"], "new york");
        assert_eq!(arr[0]["rank"], 1);
        assert_eq!(arr[1]["count"], 1);
    }

    #[test]
    fn tsv_and_txt_exports() {
        let dir = tempfile::tempdir().unwrap();
        let r = [ranking()];

        let tsv = export_rankings(&r, "c", ExportFormat::Tsv, dir.path()).unwrap();
        let content = std::fs::read_to_string(&tsv[0]).unwrap();
        assert!(content.lines().nth(1).unwrap().starts_with("1\tnew york\t3"));

        let txt = export_rankings(&r, "c", ExportFormat::Txt, dir.path()).unwrap();
        let content = std::fs::read_to_string(&txt[0]).unwrap();
        assert!(content.starts_with("Bigram ranked by PMI (2 entries)"));
        assert!(content.contains("new york"));
    }
}
