#![forbid(unsafe_code)]
//! # emotion_analysis
//!
//! Lexicon-based emotion scoring of free text. Input is split into sentences,
//! cleaned, stripped of stop words and stemmed; each stem is looked up in an
//! emotion lexicon, adjusted for a preceding negator or intensifier and summed
//! per sentence and for the whole text. The text profile is normalized to
//! 0..1 and the dominant emotion picked.
//!
//! ## Example
//! ```
//! use emotion_analysis::{Analyzer, Emotion};
//!
//! let analyzer = Analyzer::builtin().unwrap();
//! let report = analyzer.analyze_text("I am so happy today :)", "example");
//! assert_eq!(report.dominant, Some(Emotion::Joy));
//! assert_eq!(report.emotions.get(Emotion::Joy), 1.0);
//! ```

pub mod emotion;
pub mod error;
pub mod export;
pub mod lexicon;
pub mod preprocess;
pub mod scorer;
pub mod sources;
pub mod visualize;

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

pub use emotion::{Emotion, EmotionScores, WordScores};
pub use error::{EmotionError, Result};
pub use export::{csv_safe_cell, export_report, write_charts, write_html};
pub use lexicon::{JsonThesaurus, Lexicon, LexiconConfig, LexiconStats, SeedWords, Thesaurus};
pub use preprocess::{Preprocessed, Preprocessor};
pub use scorer::{Scorer, ScoringConfig, TextScore};
pub use sources::{extract_text_from_docx, extract_text_from_odt, read_text};
pub use visualize::{DisplayWord, Highlight};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Txt,
    Csv,
    Tsv,
    Json,
}

/// Everything the front end can switch for one run.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Write report files in this format; `None` prints only.
    pub export_format: Option<ExportFormat>,
    pub out_dir: PathBuf,
    /// Write radar/timeline SVG files.
    pub charts: bool,
    /// Write a highlighted HTML transcript.
    pub html: bool,
    /// Analyze all files of a directory as one text.
    pub combine: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            export_format: None,
            out_dir: PathBuf::from("."),
            charts: false,
            html: false,
            combine: false,
        }
    }
}

/// Result of analyzing one text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionReport {
    pub source: String,
    /// Normalized 0..1 profile.
    pub emotions: EmotionScores,
    pub dominant: Option<Emotion>,
    pub raw_totals: EmotionScores,
    pub per_sentence: Vec<EmotionScores>,
    /// Unstemmed words with their adjusted weights, per sentence.
    pub words: Vec<Vec<DisplayWord>>,
    pub emoticons: Vec<String>,
}

impl EmotionReport {
    /// Two lines: the dominant emotion and the full profile.
    ///
    /// ```text
    /// Dominant: JOY (1.00)
    /// joy: 1.00 | anger: 0.00 | sadness: 0.33 | fear: 0.00 | surprise: 0.00 | disgust: 0.00
    /// ```
    pub fn summary(&self) -> String {
        let head = match self.dominant {
            Some(e) => format!(
                "Dominant: {} ({:.2})",
                e.name().to_uppercase(),
                self.emotions.get(e)
            ),
            None => "Dominant: NONE".to_string(),
        };
        let scores: Vec<String> = self
            .emotions
            .iter()
            .map(|(e, s)| format!("{}: {:.2}", e, s))
            .collect();
        format!("{head}\n{}", scores.join(" | "))
    }
}

/// Pairs unstemmed tokens with the scores of their stems. Both sides come
/// from the same preprocessing pass, so shapes match one to one.
fn pair_display_words(
    original: Vec<Vec<String>>,
    scored: Vec<Vec<scorer::ScoredToken>>,
) -> Vec<Vec<DisplayWord>> {
    original
        .into_iter()
        .zip(scored)
        .map(|(words, tokens)| {
            words
                .into_iter()
                .zip(tokens)
                .map(|(word, token)| DisplayWord {
                    word,
                    scores: token.scores,
                })
                .collect()
        })
        .collect()
}

/// Preprocessor, lexicon and scoring rules bundled for repeated analyses.
pub struct Analyzer {
    preprocessor: Preprocessor,
    lexicon: Lexicon,
    scoring: ScoringConfig,
}

impl Analyzer {
    pub fn new(preprocessor: Preprocessor, lexicon: Lexicon, scoring: ScoringConfig) -> Self {
        Analyzer {
            preprocessor,
            lexicon,
            scoring,
        }
    }

    /// Default stop words, the built-in lexicon and default scoring rules.
    pub fn builtin() -> Result<Self> {
        let preprocessor = Preprocessor::new();
        let lexicon = Lexicon::builtin(&preprocessor)?;
        Ok(Analyzer::new(preprocessor, lexicon, ScoringConfig::default()))
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn analyze_text(&self, text: &str, source: &str) -> EmotionReport {
        let pre = self.preprocessor.preprocess(text);
        let scorer = Scorer::new(&self.lexicon, self.scoring);
        let score = scorer.score_text(&pre.original, &pre.stemmed, &pre.emoticons);
        EmotionReport {
            source: source.to_string(),
            emotions: score.emotions,
            dominant: score.dominant,
            raw_totals: score.raw_totals,
            per_sentence: score.per_sentence,
            words: pair_display_words(pre.original, score.word_results),
            emoticons: pre.emoticons,
        }
    }
}

/// Reports for every analyzed input plus the files that could not be read.
#[derive(Debug, Default)]
pub struct PathReport {
    pub reports: Vec<EmotionReport>,
    pub written: Vec<PathBuf>,
    pub failed_files: Vec<(String, String)>,
}

/// Supported documents under `path` (the file itself, or a recursive walk),
/// sorted for stable output.
pub fn collect_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && sources::is_supported(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "text".to_string())
}

/// Writes whatever `options` asks for and returns the written paths.
pub fn write_outputs(
    report: &EmotionReport,
    stem: &str,
    options: &AnalysisOptions,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    if let Some(format) = options.export_format {
        written.extend(export_report(report, stem, format, &options.out_dir)?);
    }
    if options.charts {
        written.extend(write_charts(report, stem, &options.out_dir)?);
    }
    if options.html {
        written.push(write_html(report, stem, &options.out_dir)?);
    }
    Ok(written)
}

/// Analyzes a file or directory. Files are read and scored in parallel;
/// unreadable files are collected instead of aborting the run. With
/// `options.combine` all texts are joined and scored as one under the stem
/// `combined`.
pub fn analyze_path(
    path: &Path,
    analyzer: &Analyzer,
    options: &AnalysisOptions,
) -> Result<PathReport> {
    if !path.exists() {
        return Err(EmotionError::MissingPath(path.to_path_buf()));
    }
    let files = collect_files(path);
    if files.is_empty() {
        warn!("No supported files found in {}", path.display());
        return Ok(PathReport::default());
    }
    info!("Analyzing {} file(s)", files.len());

    let texts: Vec<(PathBuf, Result<String>)> = files
        .into_par_iter()
        .map(|f| {
            let text = read_text(&f);
            (f, text)
        })
        .collect();

    let mut report = PathReport::default();
    let mut loaded = Vec::new();
    for (file, text) in texts {
        match text {
            Ok(t) => loaded.push((file, t)),
            Err(e) => report
                .failed_files
                .push((file.display().to_string(), e.to_string())),
        }
    }
    if loaded.is_empty() {
        return Err(EmotionError::NothingAnalyzed(report.failed_files.len()));
    }

    if options.combine {
        let joined = loaded
            .iter()
            .map(|(_, t)| t.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let r = analyzer.analyze_text(&joined, &path.display().to_string());
        report.written.extend(write_outputs(&r, "combined", options)?);
        report.reports.push(r);
    } else {
        let analyzed: Vec<(String, EmotionReport)> = loaded
            .par_iter()
            .map(|(file, text)| {
                (
                    file_stem(file),
                    analyzer.analyze_text(text, &file.display().to_string()),
                )
            })
            .collect();
        for (stem, r) in analyzed {
            report.written.extend(write_outputs(&r, &stem, options)?);
            report.reports.push(r);
        }
    }
    Ok(report)
}

pub fn print_failed_files(failed: &[(String, String)]) {
    eprintln!("\nThe following files could not be analyzed:");
    for (file, err) in failed {
        eprintln!("  {file}: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_words_keep_original_form() {
        let analyzer = Analyzer::builtin().unwrap();
        let r = analyzer.analyze_text("The dogs were terrified.", "t");
        assert_eq!(r.words.len(), 1);
        let words: Vec<&str> = r.words[0].iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, vec!["dogs", "terrified"]);
        assert!(r.words[0][0].scores.is_empty());
        assert_eq!(r.words[0][1].scores[&Emotion::Fear], 0.9);
        assert_eq!(r.dominant, Some(Emotion::Fear));
    }

    #[test]
    fn summary_lists_all_emotions() {
        let analyzer = Analyzer::builtin().unwrap();
        let r = analyzer.analyze_text("I hate this.", "t");
        let s = r.summary();
        assert!(s.starts_with("Dominant: ANGER (1.00)\n"));
        assert!(s.contains("joy: 0.00 | anger: 1.00 | sadness: 0.00"));

        let empty = analyzer.analyze_text("The table.", "t");
        assert!(empty.summary().starts_with("Dominant: NONE"));
    }

    #[test]
    fn collect_files_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "x").unwrap();
        std::fs::write(dir.path().join("a.md"), "x").unwrap();
        std::fs::write(dir.path().join("c.png"), "x").unwrap();
        let files = collect_files(dir.path());
        let names: Vec<String> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.md", "b.txt"]);
    }
}
