//! Flesch readability scoring over the aggregated marketing copy.
//!
//! Pure heuristics: vowel-group syllable counting with silent-e and
//! "-ious"/"-eous" corrections, sentence/word tokenization, and the two
//! classic Flesch formulas. No real NLP.

use crate::content::extract_readable_text;
use crate::models::{ParsedContent, ValidationIssue, ValidationResult, ValidatorConfig};
use crate::validators::{Validator, ValidatorKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static SENTENCE_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Raw readability measurements for one block of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadabilityStats {
    pub total_words: usize,
    pub total_sentences: usize,
    pub total_syllables: usize,
    pub avg_sentence_length: f64,
    pub flesch_reading_ease: f64,
    pub flesch_kincaid_grade: f64,
    pub complex_word_percent: f64,
}

/// Split text into sentences on `[.!?]` followed by whitespace.
/// Fragments with no alphabetic character are discarded.
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|s| s.chars().any(|c| c.is_alphabetic()))
        .collect()
}

/// Tokenize words: strip everything except letters, apostrophes, hyphens
/// and whitespace, then split on whitespace. Tokens without an alphabetic
/// character are discarded.
pub fn tokenize_words(text: &str) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_alphabetic() || *c == '\'' || *c == '-' || c.is_whitespace())
        .collect();
    cleaned
        .split_whitespace()
        .filter(|w| w.chars().any(|c| c.is_alphabetic()))
        .map(|w| w.to_string())
        .collect()
}

/// Count syllables in a single word via vowel-group transitions.
///
/// Corrections: a trailing silent "e" drops one syllable (except very
/// short "-le" words), and "-ious"/"-eous" endings add one back since the
/// crude vowel-group count reads them as a single group. Any non-empty
/// word counts at least one syllable; words of one or two letters are
/// always exactly one.
pub fn count_syllables(word: &str) -> usize {
    let w: String = word
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect();
    if w.is_empty() {
        return 0;
    }
    if w.chars().count() <= 2 {
        return 1;
    }

    let mut count = 0usize;
    let mut prev_was_vowel = false;
    for c in w.chars() {
        let is_vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if is_vowel && !prev_was_vowel {
            count += 1;
        }
        prev_was_vowel = is_vowel;
    }

    if w.ends_with('e') && count > 1 && !(w.ends_with("le") && w.len() <= 3) {
        count -= 1;
    }
    if w.ends_with("ious") || w.ends_with("eous") {
        count += 1;
    }
    count.max(1)
}

/// Compute the full readability stats for a block of text.
///
/// When the text yields no sentence break the whole text counts as one
/// sentence, so the averages stay defined. Empty text scores zero ease
/// and grade.
pub fn analyze(text: &str) -> ReadabilityStats {
    let words = tokenize_words(text);
    let sentences = split_sentences(text);
    let total_words = words.len();
    let total_sentences = if total_words > 0 {
        sentences.len().max(1)
    } else {
        sentences.len()
    };
    let total_syllables: usize = words.iter().map(|w| count_syllables(w)).sum();
    let complex_words = words.iter().filter(|w| count_syllables(w) > 3).count();

    if total_words == 0 || total_sentences == 0 {
        return ReadabilityStats {
            total_words,
            total_sentences,
            total_syllables,
            avg_sentence_length: 0.0,
            flesch_reading_ease: 0.0,
            flesch_kincaid_grade: 0.0,
            complex_word_percent: 0.0,
        };
    }

    let words_per_sentence = total_words as f64 / total_sentences as f64;
    let syllables_per_word = total_syllables as f64 / total_words as f64;
    let ease =
        (206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word).clamp(0.0, 100.0);
    let grade =
        (0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59).clamp(0.0, 20.0);
    let complex_word_percent = complex_words as f64 / total_words as f64 * 100.0;

    ReadabilityStats {
        total_words,
        total_sentences,
        total_syllables,
        avg_sentence_length: words_per_sentence,
        flesch_reading_ease: ease,
        flesch_kincaid_grade: grade,
        complex_word_percent,
    }
}

/// Readability validator: flags copy that reads too hard or too thin for
/// a general trade-business audience.
pub struct ReadabilityValidator;

impl Validator for ReadabilityValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::Readability
    }

    fn description(&self) -> &'static str {
        "Flesch readability scoring of frontmatter and body copy"
    }

    fn validate(&mut self, content: &ParsedContent, config: &ValidatorConfig) -> ValidationResult {
        let text = extract_readable_text(content);
        let stats = analyze(&text);
        let sev = config.severity;

        let mut metrics = BTreeMap::new();
        metrics.insert("fleschReadingEase".into(), stats.flesch_reading_ease);
        metrics.insert("fleschKincaidGrade".into(), stats.flesch_kincaid_grade);
        metrics.insert("avgSentenceLength".into(), stats.avg_sentence_length);
        metrics.insert("complexWordPercent".into(), stats.complex_word_percent);
        metrics.insert("totalWords".into(), stats.total_words as f64);
        metrics.insert("totalSentences".into(), stats.total_sentences as f64);
        metrics.insert("totalSyllables".into(), stats.total_syllables as f64);

        let mut issues = Vec::new();

        if let (Some(min), Some(max)) = (
            config.threshold("fleschKincaidGradeMin"),
            config.threshold("fleschKincaidGradeMax"),
        ) {
            let grade = stats.flesch_kincaid_grade;
            if grade < min || grade > max {
                let suggestion = if grade > max {
                    "Shorten sentences and prefer everyday words to lower the grade level"
                } else {
                    "Add more descriptive depth; the copy reads as too simplistic"
                };
                issues.push(
                    ValidationIssue::new(
                        sev,
                        "READ_001",
                        format!(
                            "Flesch-Kincaid grade {:.1} is outside the target range {:.0}-{:.0}",
                            grade, min, max
                        ),
                    )
                    .suggestion(suggestion)
                    .score(grade)
                    .detail("fleschKincaidGrade", grade)
                    .detail("min", min)
                    .detail("max", max),
                );
            }
        }

        if let (Some(min), Some(max)) = (
            config.threshold("fleschReadingEaseMin"),
            config.threshold("fleschReadingEaseMax"),
        ) {
            let ease = stats.flesch_reading_ease;
            if ease < min || ease > max {
                let suggestion = if ease < min {
                    "Simplify the copy; long sentences and polysyllabic words hurt readability"
                } else {
                    "Add more substance; the copy may read as thin"
                };
                issues.push(
                    ValidationIssue::new(
                        sev,
                        "READ_002",
                        format!(
                            "Flesch reading ease {:.1} is outside the target range {:.0}-{:.0}",
                            ease, min, max
                        ),
                    )
                    .suggestion(suggestion)
                    .score(ease)
                    .detail("fleschReadingEase", ease)
                    .detail("min", min)
                    .detail("max", max),
                );
            }
        }

        if let (Some(min), Some(max)) = (
            config.threshold("avgSentenceLengthMin"),
            config.threshold("avgSentenceLengthMax"),
        ) {
            let avg = stats.avg_sentence_length;
            if avg < min || avg > max {
                let suggestion = if avg > max {
                    "Split long sentences into shorter ones"
                } else {
                    "Combine choppy sentences into fuller ones"
                };
                issues.push(
                    ValidationIssue::new(
                        sev,
                        "READ_003",
                        format!(
                            "Average sentence length {:.1} words is outside the target range {:.0}-{:.0}",
                            avg, min, max
                        ),
                    )
                    .suggestion(suggestion)
                    .score(avg)
                    .detail("avgSentenceLength", avg)
                    .detail("min", min)
                    .detail("max", max),
                );
            }
        }

        if let Some(max) = config.threshold("complexWordPercentMax") {
            let pct = stats.complex_word_percent;
            if pct > max {
                issues.push(
                    ValidationIssue::new(
                        sev,
                        "READ_004",
                        format!(
                            "{:.1}% of words have more than three syllables (max {:.0}%)",
                            pct, max
                        ),
                    )
                    .suggestion("Swap complex vocabulary for simpler alternatives")
                    .score(pct)
                    .detail("complexWordPercent", pct)
                    .detail("max", max),
                );
            }
        }

        ValidationResult::new(content, self.kind().name(), issues, metrics)
    }
}
