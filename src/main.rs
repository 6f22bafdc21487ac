#![forbid(unsafe_code)]
//! # Emotion Analysis CLI
//!
//! Command-line front end for the `emotion_analysis` crate. Scores a text,
//! a file or a directory of documents against an emotion lexicon, prints the
//! profile and a highlighted transcript, and optionally exports reports and
//! charts.
//!
//! ## Example
//! ```bash
//! cargo run --release -- diary.txt --charts --export-format json
//! cargo run --release -- --text "I was thrilled, but terrified too." --no-color
//! cargo run --release -- --build-lexicon data/emotion_lexicon.json
//! ```
//!
//! See `--help` for all available options.

use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::error;

use emotion_analysis::lexicon::{self, JsonThesaurus, LexiconConfig};
use emotion_analysis::preprocess::load_stop_words_file;
use emotion_analysis::visualize::render_transcript;
use emotion_analysis::{
    AnalysisOptions, Analyzer, EmotionError, EmotionReport, ExportFormat, Highlight, Lexicon,
    Preprocessor, ScoringConfig, analyze_path, print_failed_files, write_outputs,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// File or directory to analyze (use - for stdin)
    #[arg(required_unless_present_any = ["text", "build_lexicon"])]
    path: Option<String>,

    /// Analyze this text instead of a file
    #[arg(long, conflicts_with = "path")]
    text: Option<String>,

    /// Lexicon JSON file (default: built-in lexicon)
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Optional path to additional stopword file (.txt, one word per line)
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// Output format for export (txt, csv, tsv, json)
    #[arg(long)]
    export_format: Option<ExportFormat>,

    /// Directory for exported files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Write radar and timeline charts as SVG
    #[arg(long, default_value_t = false)]
    charts: bool,

    /// Write a highlighted HTML transcript
    #[arg(long, default_value_t = false)]
    html: bool,

    /// Print the transcript without terminal colors
    #[arg(long, default_value_t = false)]
    no_color: bool,

    /// If set, analyze all files together and output combined results
    #[arg(long, default_value_t = false)]
    combine: bool,

    /// Weight kept by a negated emotion word after flipping
    #[arg(long, default_value_t = 0.5)]
    negation_factor: f64,

    /// Maximum weight of a single intensified word
    #[arg(long, default_value_t = 1.0)]
    intensity_cap: f64,

    /// Build a lexicon from seed words and write it to this file, then exit
    #[arg(long)]
    build_lexicon: Option<PathBuf>,

    /// Seed word JSON for --build-lexicon (default: built-in seeds)
    #[arg(long, requires = "build_lexicon")]
    seeds: Option<PathBuf>,

    /// Thesaurus JSON for --build-lexicon (default: built-in thesaurus)
    #[arg(long, requires = "build_lexicon")]
    thesaurus: Option<PathBuf>,

    /// Number of synsets per seed word used for expansion
    #[arg(long, default_value_t = 3, requires = "build_lexicon")]
    max_synsets: usize,

    /// Weight of seed words
    #[arg(long, default_value_t = 0.9, requires = "build_lexicon")]
    seed_weight: f64,

    /// Weight of synonyms
    #[arg(long, default_value_t = 0.6, requires = "build_lexicon")]
    synonym_weight: f64,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let outcome = match &cli.build_lexicon {
        Some(out) => build_lexicon(&cli, out),
        None => run_analysis(&cli),
    };
    match outcome {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn build_preprocessor(cli: &Cli) -> Result<Preprocessor, EmotionError> {
    let mut preprocessor = Preprocessor::new();
    if let Some(path) = &cli.stopwords {
        preprocessor.extend_stop_words(load_stop_words_file(path)?);
    }
    Ok(preprocessor)
}

fn build_lexicon(cli: &Cli, out: &Path) -> Result<bool, EmotionError> {
    // lexicon keys must not depend on user stop words
    let preprocessor = Preprocessor::new();
    let seeds = match &cli.seeds {
        Some(p) => lexicon::load_seed_words(p)?,
        None => lexicon::builtin_seed_words()?,
    };
    let thesaurus = match &cli.thesaurus {
        Some(p) => JsonThesaurus::load(p)?,
        None => JsonThesaurus::builtin()?,
    };
    let config = LexiconConfig {
        seed_weight: cli.seed_weight,
        synonym_weight: cli.synonym_weight,
        max_synsets: cli.max_synsets,
    };
    config.validate()?;
    let lexicon = Lexicon::build(&seeds, &thesaurus, &preprocessor, &config);
    lexicon.save(out)?;
    println!("Lexicon saved to {}", out.display());
    print!("{}", lexicon.stats().summary());
    Ok(true)
}

fn run_analysis(cli: &Cli) -> Result<bool, EmotionError> {
    let scoring = ScoringConfig {
        negation_factor: cli.negation_factor,
        intensity_cap: cli.intensity_cap,
    };
    scoring.validate()?;
    let preprocessor = build_preprocessor(cli)?;
    let lexicon = match &cli.lexicon {
        Some(p) => Lexicon::load(p)?,
        None => Lexicon::builtin(&preprocessor)?,
    };
    let analyzer = Analyzer::new(preprocessor, lexicon, scoring);
    let options = AnalysisOptions {
        export_format: cli.export_format,
        out_dir: cli.out_dir.clone(),
        charts: cli.charts,
        html: cli.html,
        combine: cli.combine,
    };
    let highlight = if cli.no_color || !std::io::stdout().is_terminal() {
        Highlight::Plain
    } else {
        Highlight::Ansi
    };

    let inline = match (&cli.text, cli.path.as_deref()) {
        (Some(text), _) => Some(text.clone()),
        (None, Some("-")) => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Some(buf)
        }
        _ => None,
    };

    if let Some(text) = inline {
        if text.trim().is_empty() {
            return Err(EmotionError::EmptyInput);
        }
        let report = analyzer.analyze_text(&text, "text");
        print_report(&report, highlight);
        write_outputs(&report, "text", &options)?;
        return Ok(true);
    }

    let path = cli.path.as_deref().ok_or(EmotionError::EmptyInput)?;
    let result = analyze_path(Path::new(path), &analyzer, &options)?;
    for report in &result.reports {
        print_report(report, highlight);
    }
    if !result.failed_files.is_empty() {
        print_failed_files(&result.failed_files);
        return Ok(false);
    }
    Ok(true)
}

fn print_report(report: &EmotionReport, highlight: Highlight) {
    println!("== {}", report.source);
    println!("{}", report.summary());
    if !report.emoticons.is_empty() {
        println!("Emoticons: {}", report.emoticons.join(" "));
    }
    println!();
    print!("{}", render_transcript(&report.words, highlight));
    println!();
}
