//! Writing reports, charts and transcripts to disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::prelude::*;
use csv::WriterBuilder;
use log::info;

use crate::emotion::{Emotion, dominant_of};
use crate::error::Result;
use crate::visualize::{
    DEFAULT_RADAR_TITLE, Highlight, radar_svg, render_html_page, render_transcript, timeline_svg,
};
use crate::{EmotionReport, ExportFormat};

/// Prefixes cells that a spreadsheet would evaluate as a formula.
pub fn csv_safe_cell(cell: &str) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell.to_string(),
    }
}

/// Timestamp part of export file names.
pub fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

fn output_path(out_dir: &Path, stem: &str, stamp: &str, table: &str, ext: &str) -> PathBuf {
    out_dir.join(format!("{stem}_{stamp}_{table}.{ext}"))
}

fn fmt_score(v: f64) -> String {
    format!("{v:.4}")
}

/// Writes the report in the requested format. Returns the written paths.
pub fn export_report(
    report: &EmotionReport,
    stem: &str,
    format: ExportFormat,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let stamp = timestamp();
    let written = match format {
        ExportFormat::Json => {
            let path = output_path(out_dir, stem, &stamp, "emotions", "json");
            fs::write(&path, serde_json::to_string_pretty(report)?)?;
            vec![path]
        }
        ExportFormat::Csv | ExportFormat::Tsv => {
            let (delimiter, ext) = match format {
                ExportFormat::Tsv => (b'\t', "tsv"),
                _ => (b',', "csv"),
            };
            let sentences = output_path(out_dir, stem, &stamp, "sentences", ext);
            write_sentence_table(report, &sentences, delimiter)?;
            let words = output_path(out_dir, stem, &stamp, "words", ext);
            write_word_table(report, &words, delimiter)?;
            vec![sentences, words]
        }
        ExportFormat::Txt => {
            let path = output_path(out_dir, stem, &stamp, "summary", "txt");
            let body = format!(
                "Source: {}\n{}\n\n{}",
                report.source,
                report.summary(),
                render_transcript(&report.words, Highlight::Plain)
            );
            fs::write(&path, body)?;
            vec![path]
        }
    };
    for p in &written {
        info!("Wrote {}", p.display());
    }
    Ok(written)
}

fn header_with_emotions(first: &[&str]) -> Vec<String> {
    first
        .iter()
        .map(|s| s.to_string())
        .chain(Emotion::ALL.iter().map(|e| e.name().to_string()))
        .collect()
}

fn write_sentence_table(report: &EmotionReport, path: &Path, delimiter: u8) -> Result<()> {
    let mut w = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    let mut header = header_with_emotions(&["sentence"]);
    header.push("dominant".to_string());
    w.write_record(&header)?;
    for (i, scores) in report.per_sentence.iter().enumerate() {
        let mut row = vec![(i + 1).to_string()];
        row.extend(scores.iter().map(|(_, v)| fmt_score(v)));
        row.push(scores.dominant().map(|e| e.name()).unwrap_or("").to_string());
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

/// Only words that contributed weights are listed.
fn write_word_table(report: &EmotionReport, path: &Path, delimiter: u8) -> Result<()> {
    let mut w = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    let mut header = header_with_emotions(&["sentence", "word"]);
    header.push("dominant".to_string());
    w.write_record(&header)?;
    for (i, sentence) in report.words.iter().enumerate() {
        for word in sentence.iter().filter(|w| !w.scores.is_empty()) {
            let mut row = vec![(i + 1).to_string(), csv_safe_cell(&word.word)];
            row.extend(
                Emotion::ALL
                    .iter()
                    .map(|e| fmt_score(word.scores.get(e).copied().unwrap_or(0.0))),
            );
            row.push(dominant_of(&word.scores).map(|e| e.name()).unwrap_or("").to_string());
            w.write_record(&row)?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Radar chart always, timeline only for multi-sentence input.
pub fn write_charts(report: &EmotionReport, stem: &str, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let stamp = timestamp();
    let radar = output_path(out_dir, stem, &stamp, "radar", "svg");
    fs::write(&radar, radar_svg(&report.emotions, DEFAULT_RADAR_TITLE))?;
    let mut written = vec![radar];
    if let Some(svg) = timeline_svg(&report.per_sentence) {
        let timeline = output_path(out_dir, stem, &stamp, "timeline", "svg");
        fs::write(&timeline, svg)?;
        written.push(timeline);
    }
    for p in &written {
        info!("Wrote {}", p.display());
    }
    Ok(written)
}

pub fn write_html(report: &EmotionReport, stem: &str, out_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = output_path(out_dir, stem, &timestamp(), "transcript", "html");
    let page = render_html_page(&report.source, &report.summary(), &report.words);
    fs::write(&path, page)?;
    info!("Wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_cells_are_escaped() {
        assert_eq!(csv_safe_cell("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(csv_safe_cell("-2"), "'-2");
        assert_eq!(csv_safe_cell("happy"), "happy");
        assert_eq!(csv_safe_cell(""), "");
    }

    #[test]
    fn file_names_carry_stem_stamp_and_table() {
        let p = output_path(Path::new("out"), "diary", "20260101_120000", "radar", "svg");
        assert_eq!(p, Path::new("out").join("diary_20260101_120000_radar.svg"));
        assert_eq!(timestamp().len(), 15);
    }
}
