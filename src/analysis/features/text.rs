// Text module - linguistic statistics from the transcript
//
// Tokenization uses Unicode word boundaries:
// - words:       \b\w+\b
// - sentences:   split on runs of . ! ? and keep segments that are non-empty
//                after trimming
// - hesitations: whole-word, case-insensitive "uh", "um" and their
//                elongations ("uhh", "ummm")
//
// Blank transcripts are not special-cased here; the assembler decides what a
// blank transcript means for the whole vector.

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::TextFeatures;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("valid word regex"));

static SENTENCE_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));

static HESITATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(uh+|um+)\b").expect("valid hesitation regex"));

/// Number of word tokens
pub fn count_words(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}

/// Number of non-empty sentence segments
pub fn count_sentences(text: &str) -> usize {
    SENTENCE_SPLIT_RE
        .split(text)
        .filter(|segment| !segment.trim().is_empty())
        .count()
}

/// Number of filler words
pub fn count_hesitations(text: &str) -> usize {
    HESITATION_RE.find_iter(&text.to_lowercase()).count()
}

/// Extract all text statistics
pub fn extract_text_features(text: &str) -> TextFeatures {
    let word_count = count_words(text);
    let sentence_count = count_sentences(text);
    let avg_words_per_sentence = if sentence_count > 0 {
        word_count as f64 / sentence_count as f64
    } else {
        0.0
    };

    TextFeatures {
        word_count,
        sentence_count,
        avg_words_per_sentence,
        hesitation_count: count_hesitations(text),
    }
}
