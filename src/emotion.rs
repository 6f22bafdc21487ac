//! The six emotion categories and score containers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EmotionError;

/// Emotion category. Variant order is the canonical display order and the
/// tie-break order for dominant-emotion picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Anger,
    Sadness,
    Fear,
    Surprise,
    Disgust,
}

impl Emotion {
    pub const ALL: [Emotion; 6] = [
        Emotion::Joy,
        Emotion::Anger,
        Emotion::Sadness,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Disgust,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Anger => "anger",
            Emotion::Sadness => "sadness",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Disgust => "disgust",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Emotion {
    type Err = EmotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .into_iter()
            .find(|e| e.name() == s.trim().to_lowercase())
            .ok_or_else(|| EmotionError::UnknownEmotion(s.to_string()))
    }
}

/// Sparse per-word weights: only the emotions a word is associated with.
pub type WordScores = BTreeMap<Emotion, f64>;

/// Returns the emotion with the highest weight; ties go to the earlier
/// emotion in canonical order. `None` for an empty map.
pub fn dominant_of(scores: &WordScores) -> Option<Emotion> {
    let mut best: Option<(Emotion, f64)> = None;
    for (&emotion, &score) in scores {
        match best {
            Some((_, s)) if s >= score => {}
            _ => best = Some((emotion, score)),
        }
    }
    best.map(|(e, _)| e)
}

/// Dense totals for all six emotions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EmotionScores {
    values: [f64; 6],
}

impl EmotionScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, emotion: Emotion) -> f64 {
        self.values[emotion.index()]
    }

    pub fn set(&mut self, emotion: Emotion, value: f64) {
        self.values[emotion.index()] = value;
    }

    pub fn add(&mut self, emotion: Emotion, value: f64) {
        self.values[emotion.index()] += value;
    }

    /// Adds every emotion of `other` into `self`.
    pub fn merge(&mut self, other: &EmotionScores) {
        for (i, v) in other.values.iter().enumerate() {
            self.values[i] += v;
        }
    }

    pub fn add_word(&mut self, word: &WordScores) {
        for (&emotion, &score) in word {
            self.add(emotion, score);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        Emotion::ALL.into_iter().map(|e| (e, self.get(e)))
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::MIN, f64::max)
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    /// Scales every value by the maximum so the strongest emotion becomes 1.0,
    /// rounded to two decimals. An all-zero (or non-positive) profile is left
    /// unscaled.
    pub fn normalized(&self) -> EmotionScores {
        let max = self.max();
        let divisor = if max > 0.0 { max } else { 1.0 };
        let mut out = EmotionScores::new();
        for (emotion, value) in self.iter() {
            out.set(emotion, round2(value / divisor));
        }
        out
    }

    /// Highest-scoring emotion, first in canonical order on ties. `None` when
    /// nothing scored above zero.
    pub fn dominant(&self) -> Option<Emotion> {
        if self.max() <= 0.0 {
            return None;
        }
        let mut best = Emotion::Joy;
        for (emotion, value) in self.iter() {
            if value > self.get(best) {
                best = emotion;
            }
        }
        Some(best)
    }

    pub fn to_map(&self) -> BTreeMap<Emotion, f64> {
        self.iter().collect()
    }
}

impl Serialize for EmotionScores {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EmotionScores {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<Emotion, f64>::deserialize(deserializer)?;
        let mut out = EmotionScores::new();
        for (emotion, value) in map {
            out.set(emotion, value);
        }
        Ok(out)
    }
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_names() {
        assert_eq!("Sadness".parse::<Emotion>().unwrap(), Emotion::Sadness);
        assert_eq!(Emotion::Disgust.to_string(), "disgust");
        assert!("boredom".parse::<Emotion>().is_err());
    }

    #[test]
    fn normalize_scales_to_max() {
        let mut s = EmotionScores::new();
        s.add(Emotion::Joy, 1.8);
        s.add(Emotion::Fear, 0.6);
        let n = s.normalized();
        assert_eq!(n.get(Emotion::Joy), 1.0);
        assert_eq!(n.get(Emotion::Fear), 0.33);
        assert_eq!(n.get(Emotion::Anger), 0.0);
        assert_eq!(n.dominant(), Some(Emotion::Joy));
    }

    #[test]
    fn zero_profile_has_no_dominant() {
        let s = EmotionScores::new();
        assert!(s.normalized().is_zero());
        assert_eq!(s.dominant(), None);
    }

    #[test]
    fn ties_prefer_canonical_order() {
        let mut s = EmotionScores::new();
        s.add(Emotion::Disgust, 0.5);
        s.add(Emotion::Anger, 0.5);
        assert_eq!(s.dominant(), Some(Emotion::Anger));

        let mut w = WordScores::new();
        w.insert(Emotion::Fear, 0.6);
        w.insert(Emotion::Sadness, 0.6);
        assert_eq!(dominant_of(&w), Some(Emotion::Sadness));
        assert_eq!(dominant_of(&WordScores::new()), None);
    }

    #[test]
    fn serializes_as_lowercase_map() {
        let mut s = EmotionScores::new();
        s.add(Emotion::Surprise, 0.25);
        let json = serde_json::to_value(s).unwrap();
        assert_eq!(json["surprise"], 0.25);
        assert_eq!(json["joy"], 0.0);
        let back: EmotionScores = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }
}
