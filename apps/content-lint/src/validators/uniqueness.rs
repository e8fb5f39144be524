//! Cross-file uniqueness and boilerplate detection.
//!
//! The only validator with cross-document state: each file is compared
//! against every file recorded earlier in the same corpus pass, so the
//! runner must feed files in discovery order and reset the index exactly
//! once per run. Similarity is word n-gram overlap; boilerplate is exact
//! contiguous-phrase frequency across the corpus built so far.

use crate::content::extract_readable_text;
use crate::models::{ParsedContent, ValidationIssue, ValidationResult, ValidatorConfig};
use crate::validators::readability::tokenize_words;
use crate::validators::{Validator, ValidatorKind};
use std::collections::{HashMap, HashSet};

/// Settings for one `record_and_compare` call, taken from the merged
/// validator thresholds.
#[derive(Debug, Clone, Copy)]
pub struct UniquenessThresholds {
    pub ngram_size: usize,
    pub similarity_threshold: f64,
    pub boilerplate_min_phrase_length: usize,
    pub boilerplate_min_occurrences: usize,
}

#[derive(Debug)]
struct IndexedFile {
    file: String,
    ngrams: HashSet<String>,
}

/// What one file looked like against the corpus recorded so far.
#[derive(Debug, Default)]
pub struct Comparison {
    /// Files at or above the similarity threshold, with the percentage.
    pub similar: Vec<(String, f64)>,
    /// Phrases from this file whose corpus-wide count reached the
    /// boilerplate threshold, with that count.
    pub boilerplate: Vec<(String, usize)>,
    pub max_similarity: f64,
    pub compared_files: usize,
}

/// In-process corpus index. Explicit state instead of a module-level
/// cache, so a long-lived CI process can run independent corpora without
/// leaking fingerprints between them.
#[derive(Debug, Default)]
pub struct UniquenessIndex {
    entries: Vec<IndexedFile>,
    phrase_counts: HashMap<String, usize>,
}

impl UniquenessIndex {
    pub fn new() -> UniquenessIndex {
        UniquenessIndex::default()
    }

    /// Drop all recorded fingerprints. Called once at the start of a
    /// corpus run, never per file.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.phrase_counts.clear();
    }

    /// Compare a file against everything recorded so far, then record it.
    ///
    /// Similarity between two files is the shared n-gram count over the
    /// smaller n-gram set, as a percentage. Boilerplate counting is exact
    /// contiguous phrases of the configured word length; every occurrence
    /// across the corpus (including repeats within one file) increments
    /// the count.
    pub fn record_and_compare(
        &mut self,
        file_id: &str,
        text: &str,
        t: UniquenessThresholds,
    ) -> Comparison {
        let tokens: Vec<String> = tokenize_words(text)
            .iter()
            .map(|w| w.to_lowercase())
            .collect();

        let ngrams = ngram_set(&tokens, t.ngram_size);
        let mut cmp = Comparison {
            compared_files: self.entries.len(),
            ..Comparison::default()
        };

        for entry in &self.entries {
            let denom = entry.ngrams.len().min(ngrams.len());
            if denom == 0 {
                continue;
            }
            let shared = ngrams.intersection(&entry.ngrams).count();
            let pct = shared as f64 / denom as f64 * 100.0;
            if pct > cmp.max_similarity {
                cmp.max_similarity = pct;
            }
            if pct >= t.similarity_threshold {
                cmp.similar.push((entry.file.clone(), pct));
            }
        }

        if t.boilerplate_min_phrase_length > 0
            && tokens.len() >= t.boilerplate_min_phrase_length
        {
            for window in tokens.windows(t.boilerplate_min_phrase_length) {
                let phrase = window.join(" ");
                *self.phrase_counts.entry(phrase).or_insert(0) += 1;
            }
            let mut flagged: HashSet<String> = HashSet::new();
            for window in tokens.windows(t.boilerplate_min_phrase_length) {
                let phrase = window.join(" ");
                if let Some(&count) = self.phrase_counts.get(&phrase) {
                    if count >= t.boilerplate_min_occurrences && flagged.insert(phrase.clone()) {
                        cmp.boilerplate.push((phrase, count));
                    }
                }
            }
            cmp.boilerplate.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        }

        self.entries.push(IndexedFile {
            file: file_id.to_string(),
            ngrams,
        });
        cmp
    }
}

fn ngram_set(tokens: &[String], n: usize) -> HashSet<String> {
    if n == 0 || tokens.len() < n {
        return HashSet::new();
    }
    tokens.windows(n).map(|w| w.join(" ")).collect()
}

fn thresholds_from(config: &ValidatorConfig) -> UniquenessThresholds {
    UniquenessThresholds {
        ngram_size: config.threshold("ngramSize").unwrap_or(3.0).max(1.0) as usize,
        similarity_threshold: config.threshold("similarityThreshold").unwrap_or(70.0),
        boilerplate_min_phrase_length: config
            .threshold("boilerplateMinPhraseLength")
            .unwrap_or(5.0)
            .max(1.0) as usize,
        boilerplate_min_occurrences: config
            .threshold("boilerplateMinOccurrences")
            .unwrap_or(3.0)
            .max(1.0) as usize,
    }
}

/// Uniqueness validator wrapping the corpus index.
#[derive(Default)]
pub struct UniquenessValidator {
    index: UniquenessIndex,
}

impl UniquenessValidator {
    pub fn new() -> UniquenessValidator {
        UniquenessValidator::default()
    }
}

impl Validator for UniquenessValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::Uniqueness
    }

    fn description(&self) -> &'static str {
        "Cross-file similarity and repeated-boilerplate detection"
    }

    fn reset(&mut self) {
        self.index.reset();
    }

    fn validate(&mut self, content: &ParsedContent, config: &ValidatorConfig) -> ValidationResult {
        let sev = config.severity;
        let t = thresholds_from(config);
        let text = extract_readable_text(content);
        let cmp = self
            .index
            .record_and_compare(&content.file_path.to_string_lossy(), &text, t);

        let mut metrics = std::collections::BTreeMap::new();
        metrics.insert("maxSimilarity".into(), cmp.max_similarity);
        metrics.insert("comparedFiles".into(), cmp.compared_files as f64);
        metrics.insert("boilerplatePhrases".into(), cmp.boilerplate.len() as f64);

        let mut issues = Vec::new();
        for (file, pct) in &cmp.similar {
            issues.push(
                ValidationIssue::new(
                    sev,
                    "UNIQ_001",
                    format!("Content is {:.1}% similar to {}", pct, file),
                )
                .suggestion("Rewrite shared sections so each page reads as unique")
                .score(*pct)
                .detail("similarity", *pct)
                .detail("threshold", t.similarity_threshold),
            );
        }

        if !cmp.boilerplate.is_empty() {
            let examples: Vec<String> = cmp
                .boilerplate
                .iter()
                .take(3)
                .map(|(phrase, count)| format!("\"{}\" ({}x)", phrase, count))
                .collect();
            issues.push(
                ValidationIssue::new(
                    sev,
                    "UNIQ_002",
                    format!(
                        "{} phrase(s) repeat across the corpus, e.g. {}",
                        cmp.boilerplate.len(),
                        examples.join(", ")
                    ),
                )
                .suggestion("Vary templated copy; repeated phrasing reads as duplicate content")
                .score(cmp.boilerplate.len() as f64)
                .detail("phrases", cmp.boilerplate.len() as f64)
                .detail("minOccurrences", t.boilerplate_min_occurrences as f64),
            );
        }

        ValidationResult::new(content, self.kind().name(), issues, metrics)
    }
}
