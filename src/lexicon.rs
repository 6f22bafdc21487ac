//! Stemmed word → emotion-weight table, and the builder that expands seed
//! words through a thesaurus.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::emotion::{Emotion, WordScores};
use crate::error::{EmotionError, Result, non_negative};
use crate::preprocess::Preprocessor;

const BUILTIN_SEEDS: &str = include_str!("../data/seed_words.json");
const BUILTIN_THESAURUS: &str = include_str!("../data/thesaurus.json");

/// Seed word lists per emotion.
pub type SeedWords = BTreeMap<Emotion, Vec<String>>;

/// Weights and limits used when building a lexicon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexiconConfig {
    pub seed_weight: f64,
    pub synonym_weight: f64,
    pub max_synsets: usize,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        LexiconConfig {
            seed_weight: 0.9,
            synonym_weight: 0.6,
            max_synsets: 3,
        }
    }
}

impl LexiconConfig {
    pub fn validate(&self) -> Result<()> {
        non_negative("seed weight", self.seed_weight)?;
        non_negative("synonym weight", self.synonym_weight)
    }
}

/// Source of synonyms, grouped in ordered synsets (most common sense first).
pub trait Thesaurus {
    fn synsets(&self, word: &str) -> Vec<Vec<String>>;
}

/// Thesaurus backed by a JSON object `{word: [[lemma, ...], ...]}`.
/// Lemmas use `_` between the parts of multi-word expressions.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct JsonThesaurus {
    entries: HashMap<String, Vec<Vec<String>>>,
}

impl JsonThesaurus {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&read(path)?)
    }

    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_THESAURUS)
    }
}

impl Thesaurus for JsonThesaurus {
    fn synsets(&self, word: &str) -> Vec<Vec<String>> {
        self.entries.get(word).cloned().unwrap_or_default()
    }
}

pub fn load_seed_words(path: &Path) -> Result<SeedWords> {
    Ok(serde_json::from_str(&read(path)?)?)
}

pub fn builtin_seed_words() -> Result<SeedWords> {
    Ok(serde_json::from_str(BUILTIN_SEEDS)?)
}

/// Synonyms from the first `max_synsets` synsets, lowercased, without the
/// word itself. Multi-word lemmas are skipped since lookups are per token.
pub fn get_synonyms<T: Thesaurus + ?Sized>(
    word: &str,
    thesaurus: &T,
    max_synsets: usize,
) -> HashSet<String> {
    thesaurus
        .synsets(word)
        .into_iter()
        .take(max_synsets)
        .flatten()
        .map(|lemma| lemma.replace('_', " ").to_lowercase())
        .filter(|clean| clean != word && !clean.contains(' '))
        .collect()
}

/// Per-emotion word counts and total size of a lexicon.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LexiconStats {
    pub entries: usize,
    pub per_emotion: BTreeMap<Emotion, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lexicon {
    words: HashMap<String, WordScores>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a lexicon with stemmed keys. Seeds take `seed_weight` (and
    /// override an earlier synonym weight for the same emotion), synonyms
    /// take `synonym_weight` only where the pair is not yet present.
    pub fn build<T: Thesaurus + ?Sized>(
        seeds: &SeedWords,
        thesaurus: &T,
        preprocessor: &Preprocessor,
        config: &LexiconConfig,
    ) -> Lexicon {
        let mut lexicon = Lexicon::new();
        for (&emotion, words) in seeds {
            for word in words {
                let word = word.trim().to_lowercase();
                lexicon.set(preprocessor.stem(&word), emotion, config.seed_weight);

                for synonym in get_synonyms(&word, thesaurus, config.max_synsets) {
                    lexicon
                        .words
                        .entry(preprocessor.stem(&synonym))
                        .or_default()
                        .entry(emotion)
                        .or_insert(config.synonym_weight);
                }
            }
        }
        lexicon
    }

    /// The embedded seed list expanded through the embedded thesaurus.
    pub fn builtin(preprocessor: &Preprocessor) -> Result<Lexicon> {
        let seeds = builtin_seed_words()?;
        let thesaurus = JsonThesaurus::builtin()?;
        Ok(Lexicon::build(
            &seeds,
            &thesaurus,
            preprocessor,
            &LexiconConfig::default(),
        ))
    }

    pub fn from_json(json: &str) -> Result<Lexicon> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Lexicon> {
        let lexicon = Self::from_json(&read(path)?)?;
        info!("Loaded lexicon with {} entries from {}", lexicon.len(), path.display());
        Ok(lexicon)
    }

    /// Writes pretty-printed JSON with sorted keys.
    pub fn save(&self, path: &Path) -> Result<()> {
        let sorted: BTreeMap<&String, &WordScores> = self.words.iter().collect();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &sorted)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    pub fn set(&mut self, stem: String, emotion: Emotion, weight: f64) {
        self.words.entry(stem).or_default().insert(emotion, weight);
    }

    pub fn get(&self, stem: &str) -> Option<&WordScores> {
        self.words.get(stem)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn stats(&self) -> LexiconStats {
        let mut per_emotion = BTreeMap::new();
        for scores in self.words.values() {
            for emotion in scores.keys() {
                *per_emotion.entry(*emotion).or_insert(0) += 1;
            }
        }
        LexiconStats {
            entries: self.words.len(),
            per_emotion,
        }
    }
}

impl LexiconStats {
    pub fn summary(&self) -> String {
        let mut out = format!("Total entries: {}\n", self.entries);
        for (emotion, count) in &self.per_emotion {
            out.push_str(&format!("  {}: {} words\n", emotion, count));
        }
        out
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| EmotionError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<Vec<String>>);

    impl Thesaurus for Fixed {
        fn synsets(&self, _word: &str) -> Vec<Vec<String>> {
            self.0.clone()
        }
    }

    fn synsets(groups: &[&[&str]]) -> Fixed {
        Fixed(
            groups
                .iter()
                .map(|g| g.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn synonyms_respect_synset_limit_and_skip_phrases() {
        let t = synsets(&[
            &["happy", "Felicitous"],
            &["glad", "in_high_spirits"],
            &["well-chosen"],
            &["ignored"],
        ]);
        let syn = get_synonyms("happy", &t, 3);
        let expected: HashSet<String> = ["felicitous", "glad", "well-chosen"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(syn, expected);
    }

    #[test]
    fn seed_weight_overrides_synonym_weight() {
        let p = Preprocessor::new();
        let mut seeds = SeedWords::new();
        seeds.insert(Emotion::Joy, vec!["glad".into(), "cheerful".into()]);
        let mut json = HashMap::new();
        json.insert("glad".to_string(), vec![vec!["cheerful".to_string()]]);
        let t = JsonThesaurus { entries: json };

        let lex = Lexicon::build(&seeds, &t, &p, &LexiconConfig::default());
        assert_eq!(lex.get(&p.stem("cheerful")).unwrap()[&Emotion::Joy], 0.9);
        assert_eq!(lex.get(&p.stem("glad")).unwrap()[&Emotion::Joy], 0.9);
    }

    #[test]
    fn synonym_does_not_override_existing_pair() {
        let p = Preprocessor::new();
        let mut seeds = SeedWords::new();
        seeds.insert(Emotion::Fear, vec!["afraid".into()]);
        seeds.insert(Emotion::Surprise, vec!["shock".into()]);
        let t = synsets(&[&["alarm"]]);
        let config = LexiconConfig {
            synonym_weight: 0.4,
            ..LexiconConfig::default()
        };
        let lex = Lexicon::build(&seeds, &t, &p, &config);
        let alarm = lex.get(&p.stem("alarm")).unwrap();
        // mixed emotions keep both mappings
        assert_eq!(alarm[&Emotion::Fear], 0.4);
        assert_eq!(alarm[&Emotion::Surprise], 0.4);
        assert_eq!(lex.stats().per_emotion[&Emotion::Fear], 2);
    }

    #[test]
    fn builtin_lexicon_covers_every_emotion() {
        let p = Preprocessor::new();
        let lex = Lexicon::builtin(&p).unwrap();
        let stats = lex.stats();
        for emotion in Emotion::ALL {
            assert!(stats.per_emotion.get(&emotion).copied().unwrap_or(0) > 5);
        }
        assert_eq!(lex.get(&p.stem("happy")).unwrap()[&Emotion::Joy], 0.9);
    }

    #[test]
    fn save_and_load_keep_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.json");
        let mut lex = Lexicon::new();
        lex.set("happi".into(), Emotion::Joy, 0.9);
        lex.set("alarm".into(), Emotion::Fear, 0.6);
        lex.save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.find("\"alarm\"").unwrap() < text.find("\"happi\"").unwrap());
        assert_eq!(Lexicon::load(&path).unwrap(), lex);
    }

    #[test]
    fn unknown_emotion_in_json_is_rejected() {
        assert!(Lexicon::from_json(r#"{"meh": {"boredom": 0.5}}"#).is_err());
    }
}
