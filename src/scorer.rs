//! Single-pass scoring over tokenized sentences with negation and intensifier
//! tracking, plus emoticon scoring and profile normalization.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::emotion::{Emotion, EmotionScores, WordScores};
use crate::error::{Result, non_negative};
use crate::lexicon::Lexicon;
use crate::preprocess::{INTENSIFIERS, NEGATORS};

/// Tunable factors of the scoring rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    /// Applied to every weight remapped by a negation.
    pub negation_factor: f64,
    /// Upper bound of a single word's weight after intensifying.
    pub intensity_cap: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            negation_factor: 0.5,
            intensity_cap: 1.0,
        }
    }
}

impl ScoringConfig {
    /// Both factors must be finite and non-negative, otherwise normalized
    /// profiles could leave the 0..1 range.
    pub fn validate(&self) -> Result<()> {
        non_negative("negation factor", self.negation_factor)?;
        non_negative("intensity cap", self.intensity_cap)
    }
}

/// Emotion a negated word is counted as.
pub fn flip(emotion: Emotion) -> Emotion {
    match emotion {
        Emotion::Joy => Emotion::Sadness,
        Emotion::Sadness => Emotion::Joy,
        Emotion::Anger => Emotion::Joy,
        Emotion::Fear => Emotion::Joy,
        // "not surprised" is still about surprise
        Emotion::Surprise => Emotion::Surprise,
        Emotion::Disgust => Emotion::Joy,
    }
}

/// Weights contributed by a single emoticon.
pub fn emoticon_scores(emoticon: &str) -> Option<(Emotion, f64)> {
    match emoticon {
        ":)" | ":-)" => Some((Emotion::Joy, 0.7)),
        ":(" | ":-(" => Some((Emotion::Sadness, 0.7)),
        ":D" => Some((Emotion::Joy, 0.9)),
        "D:" => Some((Emotion::Fear, 0.6)),
        ">:(" => Some((Emotion::Anger, 0.8)),
        ";)" => Some((Emotion::Joy, 0.5)),
        ":/" => Some((Emotion::Sadness, 0.4)),
        "<3" => Some((Emotion::Joy, 0.8)),
        _ => None,
    }
}

pub fn score_emoticons<S: AsRef<str>>(emoticons: &[S]) -> EmotionScores {
    let mut totals = EmotionScores::new();
    for (emotion, score) in emoticons.iter().filter_map(|e| emoticon_scores(e.as_ref())) {
        totals.add(emotion, score);
    }
    totals
}

/// A stemmed token and the adjusted weights it contributed (empty for
/// modifiers and words missing from the lexicon).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredToken {
    pub token: String,
    pub scores: WordScores,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceScore {
    pub totals: EmotionScores,
    pub tokens: Vec<ScoredToken>,
}

/// Whole-text result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextScore {
    /// Normalized 0..1 profile.
    pub emotions: EmotionScores,
    pub dominant: Option<Emotion>,
    /// Raw (unnormalized) totals, emoticons included.
    pub raw_totals: EmotionScores,
    pub per_sentence: Vec<EmotionScores>,
    pub word_results: Vec<Vec<ScoredToken>>,
}

enum Modifier {
    Negation,
    Intensifier(f64),
}

/// Scores tokenized sentences against a lexicon.
///
/// Modifiers are recognized on the unstemmed word: stemming merges some of
/// them with ordinary words (`hardly` and `hard` share a stem).
pub struct Scorer<'a> {
    lexicon: &'a Lexicon,
    negators: HashSet<&'static str>,
    intensifiers: HashMap<&'static str, f64>,
    config: ScoringConfig,
}

impl<'a> Scorer<'a> {
    pub fn new(lexicon: &'a Lexicon, config: ScoringConfig) -> Self {
        Scorer {
            lexicon,
            negators: NEGATORS.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            config,
        }
    }

    fn modifier(&self, word: &str) -> Option<Modifier> {
        if self.negators.contains(word) {
            return Some(Modifier::Negation);
        }
        self.intensifiers.get(word).map(|m| Modifier::Intensifier(*m))
    }

    pub fn score_word(&self, token: &str) -> WordScores {
        self.lexicon.get(token).cloned().unwrap_or_default()
    }

    /// Remaps each emotion through [`flip`] at reduced weight. Emotions that
    /// land on the same target are summed.
    pub fn apply_negation(&self, scores: WordScores, negated: bool) -> WordScores {
        if !negated {
            return scores;
        }
        let mut flipped = WordScores::new();
        for (emotion, score) in scores {
            *flipped.entry(flip(emotion)).or_insert(0.0) += score * self.config.negation_factor;
        }
        flipped
    }

    pub fn apply_intensifier(&self, scores: WordScores, multiplier: f64) -> WordScores {
        scores
            .into_iter()
            .map(|(e, s)| (e, (s * multiplier).min(self.config.intensity_cap)))
            .collect()
    }

    /// Walks one sentence given as parallel word and stem lists. A negator
    /// or intensifier is held until the next ordinary token, which consumes
    /// both whether or not it is in the lexicon.
    pub fn score_sentence<W: AsRef<str>, S: AsRef<str>>(
        &self,
        words: &[W],
        stems: &[S],
    ) -> SentenceScore {
        let mut totals = EmotionScores::new();
        let mut scored = Vec::with_capacity(stems.len());
        let mut negated = false;
        let mut multiplier = 1.0;

        for (word, token) in words.iter().zip(stems) {
            let token = token.as_ref();
            match self.modifier(word.as_ref()) {
                Some(Modifier::Negation) => negated = true,
                Some(Modifier::Intensifier(m)) => multiplier = m,
                None => {
                    let raw = self.score_word(token);
                    let adjusted = if raw.is_empty() {
                        raw
                    } else {
                        let negated_scores = self.apply_negation(raw, negated);
                        self.apply_intensifier(negated_scores, multiplier)
                    };
                    totals.add_word(&adjusted);
                    scored.push(ScoredToken {
                        token: token.to_string(),
                        scores: adjusted,
                    });
                    negated = false;
                    multiplier = 1.0;
                    continue;
                }
            }
            scored.push(ScoredToken {
                token: token.to_string(),
                scores: WordScores::new(),
            });
        }

        SentenceScore {
            totals,
            tokens: scored,
        }
    }

    /// Scores all sentences, adds emoticon weights to the text totals and
    /// normalizes. `words` and `stems` have the same shape.
    pub fn score_text<W: AsRef<str>, S: AsRef<str>, E: AsRef<str>>(
        &self,
        words: &[Vec<W>],
        stems: &[Vec<S>],
        emoticons: &[E],
    ) -> TextScore {
        let mut raw_totals = EmotionScores::new();
        let mut per_sentence = Vec::with_capacity(stems.len());
        let mut word_results = Vec::with_capacity(stems.len());

        for (sentence_words, sentence_stems) in words.iter().zip(stems) {
            let sentence = self.score_sentence(sentence_words, sentence_stems);
            raw_totals.merge(&sentence.totals);
            per_sentence.push(sentence.totals);
            word_results.push(sentence.tokens);
        }
        raw_totals.merge(&score_emoticons(emoticons));

        let emotions = raw_totals.normalized();
        TextScore {
            dominant: emotions.dominant(),
            emotions,
            raw_totals,
            per_sentence,
            word_results,
        }
    }
}
