//! Shared data models for parsed content, validator settings, and results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Issue severity. `error` fails the build, `warning` is visible but
/// non-blocking, `info` is advisory only.
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Parse a severity token from config files. Accepts `warn` as an
    /// alias for `warning`.
    pub fn parse(s: &str) -> Option<Severity> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Severity::Error),
            "warning" | "warn" => Some(Severity::Warning),
            "info" => Some(Severity::Info),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Content kind, derived from the path segment the file lives under.
pub enum ContentType {
    Service,
    Location,
}

impl ContentType {
    /// Derive the content type from any path component. Files outside a
    /// `locations` directory count as services.
    pub fn from_path(path: &Path) -> ContentType {
        let in_locations = path.components().any(|c| c.as_os_str() == "locations");
        if in_locations {
            ContentType::Location
        } else {
            ContentType::Service
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Service => f.write_str("service"),
            ContentType::Location => f.write_str("location"),
        }
    }
}

#[derive(Debug, Clone)]
/// One parsed MDX file: structured frontmatter plus the prose body.
/// Built fresh per run and immutable afterwards.
pub struct ParsedContent {
    pub file_path: PathBuf,
    pub file_name: String,
    pub content_type: ContentType,
    /// Open-ended metadata header. Arbitrary extra keys are preserved.
    pub frontmatter: serde_yaml::Mapping,
    pub body: String,
}

impl ParsedContent {
    /// Look up a top-level string field in the frontmatter.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.frontmatter
            .get(serde_yaml::Value::String(key.to_string()))
            .and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
/// A single problem discovered by a validator. `code` is stable per
/// condition across runs; CI matches on it, not on message text.
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, f64>,
}

impl ValidationIssue {
    pub fn new(severity: Severity, code: &str, message: String) -> ValidationIssue {
        ValidationIssue {
            severity,
            code: code.to_string(),
            message,
            field: None,
            suggestion: None,
            score: None,
            details: BTreeMap::new(),
        }
    }

    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    pub fn suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }

    pub fn score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn detail(mut self, key: &str, value: f64) -> Self {
        self.details.insert(key.to_string(), value);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
/// Output of one validator over one file. Metrics are always populated,
/// even when no issue fired.
pub struct ValidationResult {
    pub file: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub validator: String,
    pub passed: bool,
    pub issues: Vec<ValidationIssue>,
    pub metrics: BTreeMap<String, f64>,
    pub duration_ms: u64,
}

impl ValidationResult {
    /// Assemble a result; `passed` is true iff no issue is error severity.
    /// Duration is stamped by the runner around the validator call.
    pub fn new(
        content: &ParsedContent,
        validator: &str,
        issues: Vec<ValidationIssue>,
        metrics: BTreeMap<String, f64>,
    ) -> ValidationResult {
        let passed = !issues.iter().any(|i| i.severity == Severity::Error);
        ValidationResult {
            file: content.file_path.to_string_lossy().to_string(),
            content_type: content.content_type,
            validator: validator.to_string(),
            passed,
            issues,
            metrics,
            duration_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
/// Whole-run scalar summary used by printers and the JSON report.
pub struct RunSummary {
    pub total_files: usize,
    pub passed_files: usize,
    pub error_files: usize,
    pub warning_files: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_info: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Serialize)]
/// Aggregated corpus results. Buckets partition files: a file with any
/// error counts only as an error file, else warning, else passed.
pub struct AggregatedResults {
    pub summary: RunSummary,
    pub results: BTreeMap<String, Vec<ValidationResult>>,
}

#[derive(Debug, Clone)]
/// Effective per-validator settings after merging overrides into defaults.
pub struct ValidatorConfig {
    pub enabled: bool,
    /// Default severity for issues this validator raises. Individual
    /// issues may override it (e.g. the CTA check is always info).
    pub severity: Severity,
    pub thresholds: BTreeMap<String, f64>,
}

impl ValidatorConfig {
    pub fn threshold(&self, key: &str) -> Option<f64> {
        self.thresholds.get(key).copied()
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
/// Caller-supplied partial settings for one validator. Thresholds are
/// merged key-by-key into the defaults, never replacing them wholesale.
pub struct ValidatorOverride {
    pub enabled: Option<bool>,
    pub severity: Option<String>,
    #[serde(default)]
    pub thresholds: BTreeMap<String, f64>,
}
