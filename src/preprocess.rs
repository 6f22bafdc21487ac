//! Text preparation: emoticon extraction, cleaning, sentence/word splitting,
//! stop-word removal and stemming.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::warn;
use rust_stemmers::{Algorithm, Stemmer};
use whatlang::Lang;

use crate::error::{EmotionError, Result};

/// Emoticons recognised in raw text. Patterns that contain a shorter pattern
/// come first so `>:(` is not consumed as `:(`.
pub const EMOTICONS: [&str; 10] = [">:(", ":-)", ":-(", ":)", ":(", ":D", "D:", ";)", ":/", "<3"];

/// English stop words (NLTK list).
const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Words that flip the emotion of the next scored word.
pub const NEGATORS: &[&str] = &[
    "not", "no", "nor", "never", "neither", "nobody", "nothing", "nowhere", "hardly", "barely",
    "don't", "doesn't", "didn't", "won't", "can't", "couldn't", "wouldn't", "shouldn't", "isn't",
    "aren't", "wasn't", "weren't",
];

/// Words that scale the next scored word, with their multipliers.
pub const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.5),
    ("extremely", 1.8),
    ("incredibly", 1.7),
    ("really", 1.4),
    ("so", 1.3),
    ("slightly", 0.5),
    ("barely", 0.4),
    ("somewhat", 0.6),
    ("quite", 1.3),
];

/// Output of [`Preprocessor::preprocess`]. `stemmed` and `original` have the
/// same shape: one inner vector per sentence, one entry per kept token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preprocessed {
    pub stemmed: Vec<Vec<String>>,
    pub original: Vec<Vec<String>>,
    pub emoticons: Vec<String>,
}

/// Finds and removes emoticons. Every occurrence is replaced by a space and
/// recorded, in pattern order.
pub fn extract_emoticons(text: &str) -> (String, Vec<String>) {
    let mut text = text.to_string();
    let mut found = Vec::new();
    for pattern in EMOTICONS {
        while let Some(pos) = text.find(pattern) {
            text.replace_range(pos..pos + pattern.len(), " ");
            found.push(pattern.to_string());
        }
    }
    (text, found)
}

/// Lowercases and keeps only ASCII letters, whitespace and apostrophes.
pub fn clean_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c == '’' { '\'' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace() || *c == '\'')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Splits at runs of `.`, `!` or `?` that are followed by whitespace or the
/// end of input, and at blank lines.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    for block in split_blank_lines(text) {
        let chars: Vec<char> = block.chars().collect();
        let mut current = String::new();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            current.push(c);
            if matches!(c, '.' | '!' | '?') {
                while i + 1 < chars.len() && matches!(chars[i + 1], '.' | '!' | '?') {
                    i += 1;
                    current.push(chars[i]);
                }
                if i + 1 == chars.len() || chars[i + 1].is_whitespace() {
                    push_sentence(&mut sentences, &current);
                    current.clear();
                }
            }
            i += 1;
        }
        push_sentence(&mut sentences, &current);
    }
    sentences
}

fn split_blank_lines(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn push_sentence(sentences: &mut Vec<String>, s: &str) {
    let s = s.trim();
    if !s.is_empty() {
        sentences.push(s.to_string());
    }
}

/// Splits text into sentences, then each cleaned sentence into words.
/// Sentences without any word are dropped.
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
    split_sentences(text)
        .iter()
        .map(|sentence| {
            clean_text(sentence)
                .split_whitespace()
                .map(|w| w.trim_matches('\''))
                .filter(|w| !w.is_empty())
                .map(String::from)
                .collect::<Vec<String>>()
        })
        .filter(|words| !words.is_empty())
        .collect()
}

/// Default stop-word set: the English list minus negators and intensifiers,
/// which the scorer needs to see.
pub fn default_stop_words() -> HashSet<String> {
    let keep: HashSet<&str> = NEGATORS
        .iter()
        .copied()
        .chain(INTENSIFIERS.iter().map(|(w, _)| *w))
        .collect();
    ENGLISH_STOP_WORDS
        .iter()
        .filter(|w| !keep.contains(*w))
        .map(|w| w.to_string())
        .collect()
}

/// Reads an additional stop-word file, one word per line.
pub fn load_stop_words_file(path: &Path) -> Result<HashSet<String>> {
    let content = fs::read_to_string(path).map_err(|source| EmotionError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content
        .lines()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect())
}

/// Holds the stemmer and stop-word set for one run.
pub struct Preprocessor {
    stemmer: Stemmer,
    stop_words: HashSet<String>,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::with_stop_words(default_stop_words())
    }

    pub fn with_stop_words(stop_words: HashSet<String>) -> Self {
        Preprocessor {
            stemmer: Stemmer::create(Algorithm::English),
            stop_words,
        }
    }

    /// Adds user stop words on top of the current set. Negators and
    /// intensifiers are never removed from the token stream.
    pub fn extend_stop_words<I: IntoIterator<Item = String>>(&mut self, words: I) {
        let protected: HashSet<&str> = NEGATORS
            .iter()
            .copied()
            .chain(INTENSIFIERS.iter().map(|(w, _)| *w))
            .collect();
        self.stop_words
            .extend(words.into_iter().filter(|w| !protected.contains(w.as_str())));
    }

    pub fn stem(&self, word: &str) -> String {
        self.stemmer.stem(word).into_owned()
    }

    pub fn remove_stop_words(&self, sentences: Vec<Vec<String>>) -> Vec<Vec<String>> {
        sentences
            .into_iter()
            .map(|s| s.into_iter().filter(|w| !self.stop_words.contains(w)).collect())
            .collect()
    }

    pub fn stem_tokens(&self, sentences: &[Vec<String>]) -> Vec<Vec<String>> {
        sentences
            .iter()
            .map(|s| s.iter().map(|w| self.stem(w)).collect())
            .collect()
    }

    /// Full pipeline: emoticons, cleaning/tokenizing, stop words, stemming.
    pub fn preprocess(&self, text: &str) -> Preprocessed {
        let (text, emoticons) = extract_emoticons(text);
        warn_if_not_english(&text);
        let filtered = self.remove_stop_words(tokenize(&text));
        let stemmed = self.stem_tokens(&filtered);
        Preprocessed {
            stemmed,
            original: filtered,
            emoticons,
        }
    }
}

fn warn_if_not_english(text: &str) {
    if let Some(info) = whatlang::detect(text) {
        if info.is_reliable() && info.lang() != Lang::Eng {
            warn!(
                "Input looks like {} rather than English; lexicon matches will be sparse",
                info.lang().eng_name()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emoticons_are_extracted_before_cleaning() {
        let (rest, found) = extract_emoticons("Great :D but >:( and :) :)");
        assert_eq!(found, vec![">:(", ":)", ":)", ":D"]);
        assert!(!rest.contains(':'));
    }

    #[test]
    fn clean_keeps_letters_and_apostrophes() {
        assert_eq!(clean_text("  I'm SO happy, 100%!  "), "i'm so happy");
        assert_eq!(clean_text("Don’t"), "don't");
    }

    #[test]
    fn sentences_split_on_terminators() {
        let s = split_sentences("I was thrilled! Then... nothing. Is it 3.5? Yes\n\nNew paragraph");
        assert_eq!(
            s,
            vec![
                "I was thrilled!",
                "Then...",
                "nothing.",
                "Is it 3.5?",
                "Yes",
                "New paragraph"
            ]
        );
    }

    #[test]
    fn tokenize_drops_empty_sentences() {
        let t = tokenize("Hello there. 123. 'Quoted' word!");
        assert_eq!(
            t,
            vec![vec!["hello", "there"], vec!["quoted", "word"]]
        );
    }

    #[test]
    fn stop_words_keep_negators_and_intensifiers() {
        let stop = default_stop_words();
        assert!(stop.contains("the"));
        assert!(!stop.contains("not"));
        assert!(!stop.contains("don't"));
        assert!(!stop.contains("very"));
        assert!(!stop.contains("so"));
    }

    #[test]
    fn preprocess_shapes_match() {
        let p = Preprocessor::new();
        let out = p.preprocess("The running dogs were NOT happy. :( Very sad day.");
        assert_eq!(out.emoticons, vec![":("]);
        assert_eq!(out.original.len(), 2);
        assert_eq!(out.original[0], vec!["running", "dogs", "not", "happy"]);
        assert_eq!(out.stemmed[0][0], "run");
        assert_eq!(out.stemmed[0][1], "dog");
        for (o, s) in out.original.iter().zip(&out.stemmed) {
            assert_eq!(o.len(), s.len());
        }
    }

    #[test]
    fn user_stop_words_cannot_remove_negators() {
        let mut p = Preprocessor::new();
        p.extend_stop_words(vec!["not".to_string(), "dogs".to_string()]);
        let out = p.preprocess("dogs are not cats");
        assert_eq!(out.original, vec![vec!["not", "cats"]]);
    }
}
