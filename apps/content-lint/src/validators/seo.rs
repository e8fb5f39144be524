//! SEO metrics: title/description length windows, primary-keyword
//! density, call-to-action presence, and keyword-array sizing.
//!
//! The five checks fire independently; metrics are reported even when
//! nothing fires.

use crate::content::extract_readable_text;
use crate::models::{ParsedContent, Severity, ValidationIssue, ValidationResult, ValidatorConfig};
use crate::validators::readability::tokenize_words;
use crate::validators::{Validator, ValidatorKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value as Yaml;
use std::collections::BTreeMap;

/// Call-to-action phrasing a trade-business description should carry.
static CTA_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"free quote",
        r"contact us",
        r"call (now|today)",
        r"call us",
        r"book (now|online)",
        r"request a (quote|consultation)",
        r"learn more",
        r"get started",
        r"schedule a (call|consultation)",
        r"24/7",
        r"free (consultation|estimate|survey)",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){}", p)).unwrap())
    .collect()
});

/// Whether the description contains any known call-to-action phrasing.
pub fn has_cta(description: &str) -> bool {
    CTA_PATTERNS.iter().any(|re| re.is_match(description))
}

/// Count whole-word, case-insensitive occurrences of a keyword.
/// The keyword is escaped, so regex metacharacters in content keywords
/// cannot break the pattern.
pub fn count_keyword_occurrences(text: &str, keyword: &str) -> usize {
    let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword));
    match Regex::new(&pattern) {
        Ok(re) => re.find_iter(text).count(),
        Err(_) => 0,
    }
}

fn keywords(content: &ParsedContent) -> Vec<String> {
    let key = Yaml::String("keywords".to_string());
    match content.frontmatter.get(&key) {
        Some(Yaml::Sequence(seq)) => seq
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.to_string())
            .collect(),
        _ => Vec::new(),
    }
}

/// SEO validator over frontmatter metadata and the aggregated copy.
pub struct SeoValidator;

impl Validator for SeoValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::Seo
    }

    fn description(&self) -> &'static str {
        "Title/description lengths, keyword density, and CTA presence"
    }

    fn validate(&mut self, content: &ParsedContent, config: &ValidatorConfig) -> ValidationResult {
        let sev = config.severity;
        let mut issues = Vec::new();
        let mut metrics = BTreeMap::new();

        // Title: prefer the dedicated SEO title, fall back to the page title.
        let title = content
            .field_str("seoTitle")
            .or_else(|| content.field_str("title"))
            .unwrap_or("");
        let title_len = title.chars().count();
        metrics.insert("titleLength".into(), title_len as f64);
        if let (Some(min), Some(max)) = (
            config.threshold("titleLengthMin"),
            config.threshold("titleLengthMax"),
        ) {
            if (title_len as f64) < min {
                issues.push(
                    ValidationIssue::new(
                        sev,
                        "SEO_001",
                        format!(
                            "Title is {} characters, below the minimum of {:.0}",
                            title_len, min
                        ),
                    )
                    .field("title")
                    .suggestion("Lengthen the title with the service and area served")
                    .score(title_len as f64)
                    .detail("titleLength", title_len as f64)
                    .detail("min", min)
                    .detail("max", max),
                );
            } else if (title_len as f64) > max {
                issues.push(
                    ValidationIssue::new(
                        sev,
                        "SEO_001",
                        format!(
                            "Title is {} characters, above the maximum of {:.0}",
                            title_len, max
                        ),
                    )
                    .field("title")
                    .suggestion("Shorten the title; search engines truncate long titles")
                    .score(title_len as f64)
                    .detail("titleLength", title_len as f64)
                    .detail("min", min)
                    .detail("max", max),
                );
            }
        }

        // Description window, only checked when a description exists.
        let description = content.field_str("description").unwrap_or("");
        let desc_len = description.chars().count();
        metrics.insert("descriptionLength".into(), desc_len as f64);
        if desc_len > 0 {
            if let (Some(min), Some(max)) = (
                config.threshold("descriptionLengthMin"),
                config.threshold("descriptionLengthMax"),
            ) {
                if (desc_len as f64) < min || (desc_len as f64) > max {
                    let (direction, suggestion) = if (desc_len as f64) < min {
                        ("below", "Expand the description toward the full snippet length")
                    } else {
                        ("above", "Trim the description; search engines cut it off")
                    };
                    issues.push(
                        ValidationIssue::new(
                            sev,
                            "SEO_002",
                            format!(
                                "Description is {} characters, {} the {:.0}-{:.0} window",
                                desc_len, direction, min, max
                            ),
                        )
                        .field("description")
                        .suggestion(suggestion)
                        .score(desc_len as f64)
                        .detail("descriptionLength", desc_len as f64)
                        .detail("min", min)
                        .detail("max", max),
                    );
                }
            }
        }

        // Primary-keyword density over the same aggregated text the
        // readability scorer sees.
        let keyword_list = keywords(content);
        let text = extract_readable_text(content);
        let total_words = tokenize_words(&text).len();
        let mut density = 0.0;
        if let Some(primary) = keyword_list.first() {
            if total_words > 0 {
                let occurrences = count_keyword_occurrences(&text, primary);
                density = occurrences as f64 / total_words as f64 * 100.0;
                if let (Some(min), Some(max)) = (
                    config.threshold("keywordDensityMin"),
                    config.threshold("keywordDensityMax"),
                ) {
                    if density < min {
                        issues.push(
                            ValidationIssue::new(
                                sev,
                                "SEO_003",
                                format!(
                                    "Keyword \"{}\" density {:.1}% is below the minimum {:.1}%",
                                    primary, density, min
                                ),
                            )
                            .field("keywords")
                            .suggestion("Work the primary keyword into headings and copy naturally")
                            .score(density)
                            .detail("keywordDensity", density)
                            .detail("occurrences", occurrences as f64)
                            .detail("min", min)
                            .detail("max", max),
                        );
                    } else if density > max {
                        issues.push(
                            ValidationIssue::new(
                                sev,
                                "SEO_003",
                                format!(
                                    "Keyword \"{}\" density {:.1}% is above the maximum {:.1}%; copy reads as keyword-stuffed",
                                    primary, density, max
                                ),
                            )
                            .field("keywords")
                            .suggestion("Reduce keyword repetition; vary the phrasing")
                            .score(density)
                            .detail("keywordDensity", density)
                            .detail("occurrences", occurrences as f64)
                            .detail("min", min)
                            .detail("max", max),
                        );
                    }
                }
            }
        }
        metrics.insert("keywordDensity".into(), density);

        // CTA presence is advisory regardless of the configured severity.
        let cta = has_cta(description);
        metrics.insert("hasCTA".into(), if cta { 1.0 } else { 0.0 });
        if !cta {
            issues.push(
                ValidationIssue::new(
                    Severity::Info,
                    "SEO_004",
                    "Description has no call to action".to_string(),
                )
                .field("description")
                .suggestion(
                    "Add a call to action such as \"call us today\" or \"get a free quote\"",
                ),
            );
        }

        // Keyword-array sizing: too few is a real gap, too many is noise.
        let count = keyword_list.len();
        metrics.insert("keywordCount".into(), count as f64);
        if let (Some(min), Some(max)) = (
            config.threshold("keywordCountMin"),
            config.threshold("keywordCountMax"),
        ) {
            if (count as f64) < min {
                let missing = (min as usize).saturating_sub(count);
                issues.push(
                    ValidationIssue::new(
                        sev,
                        "SEO_005",
                        format!("Only {} keywords declared; add {} more", count, missing),
                    )
                    .field("keywords")
                    .score(count as f64)
                    .detail("keywordCount", count as f64)
                    .detail("min", min)
                    .detail("max", max),
                );
            } else if (count as f64) > max {
                issues.push(
                    ValidationIssue::new(
                        Severity::Info,
                        "SEO_005",
                        format!(
                            "{} keywords declared; consider trimming below {:.0}",
                            count, max
                        ),
                    )
                    .field("keywords")
                    .score(count as f64)
                    .detail("keywordCount", count as f64)
                    .detail("min", min)
                    .detail("max", max),
                );
            }
        }

        ValidationResult::new(content, self.kind().name(), issues, metrics)
    }
}
