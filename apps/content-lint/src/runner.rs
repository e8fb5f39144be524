//! Corpus runner: discovery, per-file validation, and aggregation.
//!
//! Files are processed strictly in discovery order, one at a time; the
//! uniqueness validator must see earlier files' fingerprints when judging
//! the current one, so there is no file-level parallelism. The uniqueness
//! index is reset exactly once at the start of each corpus run.

use crate::config::merged_config;
use crate::content::{discover_content, parse_mdx};
use crate::models::{
    AggregatedResults, RunSummary, Severity, ValidationResult, ValidatorOverride,
};
use crate::validators::{Registry, ValidatorKind};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, thiserror::Error)]
/// Errors that abort a run. Parsing failures are deliberately fatal:
/// malformed content should block CI, not be silently skipped.
pub enum RunError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("failed to read {}: {source}", .file.display())]
    Io {
        file: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid frontmatter in {}: {source}", .file.display())]
    Frontmatter {
        file: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("unterminated frontmatter block in {}", .0.display())]
    UnterminatedFrontmatter(PathBuf),
    #[error("frontmatter in {} is not a mapping", .0.display())]
    FrontmatterShape(PathBuf),
}

#[derive(Debug, Default, Clone)]
/// Options for one run, resolved from CLI flags and the config file.
pub struct RunOptions {
    /// Validator subset to run; `None` means all registered validators.
    pub validators: Option<Vec<ValidatorKind>>,
    /// Validate one explicit file instead of the content tree.
    pub file: Option<PathBuf>,
    /// Per-validator overrides merged into the built-in defaults.
    pub overrides: BTreeMap<ValidatorKind, ValidatorOverride>,
}

/// Run a single validator over already-parsed content.
///
/// Returns `None` when the validator is disabled by config; a disabled
/// validator is a valid, silent no-op, not an error.
pub fn run_validator(
    registry: &mut Registry,
    content: &crate::models::ParsedContent,
    kind: ValidatorKind,
    ov: Option<&ValidatorOverride>,
) -> Option<ValidationResult> {
    let config = merged_config(kind, ov);
    if !config.enabled {
        return None;
    }
    let validator = registry.get_mut(kind)?;
    let started = Instant::now();
    let mut result = validator.validate(content, &config);
    result.duration_ms = started.elapsed().as_millis() as u64;
    Some(result)
}

/// Parse one file and run the requested validator subset (or all of
/// them) over it, in registration order.
pub fn validate_file(
    registry: &mut Registry,
    path: &Path,
    options: &RunOptions,
) -> Result<Vec<ValidationResult>, RunError> {
    let content = parse_mdx(path)?;
    let kinds: Vec<ValidatorKind> = match &options.validators {
        Some(subset) => subset.clone(),
        None => ValidatorKind::ALL.to_vec(),
    };
    let mut results = Vec::new();
    for kind in kinds {
        if let Some(result) =
            run_validator(registry, &content, kind, options.overrides.get(&kind))
        {
            results.push(result);
        }
    }
    Ok(results)
}

/// Run the full corpus pass and fold everything into `AggregatedResults`.
///
/// Discovers every `.mdx` file under `<content_dir>/services` and
/// `<content_dir>/locations` (missing directories are tolerated as zero
/// files), or validates the single file from `options.file` (missing is
/// a hard error). A file with any error-severity issue lands in the
/// error bucket; else any warning puts it in the warning bucket; else it
/// passed.
pub fn run_validators(
    content_dir: &Path,
    options: &RunOptions,
) -> Result<AggregatedResults, RunError> {
    let started = Instant::now();
    let mut registry = Registry::new();
    registry.reset_all();

    let files: Vec<PathBuf> = match &options.file {
        Some(file) => {
            if !file.exists() {
                return Err(RunError::FileNotFound(file.clone()));
            }
            vec![file.clone()]
        }
        None => discover_content(content_dir),
    };

    let mut results: BTreeMap<String, Vec<ValidationResult>> = BTreeMap::new();
    let mut passed_files = 0usize;
    let mut error_files = 0usize;
    let mut warning_files = 0usize;
    let mut total_errors = 0usize;
    let mut total_warnings = 0usize;
    let mut total_info = 0usize;

    for path in &files {
        let file_results = validate_file(&mut registry, path, options)?;
        let mut has_error = false;
        let mut has_warning = false;
        for result in &file_results {
            for issue in &result.issues {
                match issue.severity {
                    Severity::Error => {
                        has_error = true;
                        total_errors += 1;
                    }
                    Severity::Warning => {
                        has_warning = true;
                        total_warnings += 1;
                    }
                    Severity::Info => total_info += 1,
                }
            }
        }
        if has_error {
            error_files += 1;
        } else if has_warning {
            warning_files += 1;
        } else {
            passed_files += 1;
        }
        results.insert(path.to_string_lossy().to_string(), file_results);
    }

    Ok(AggregatedResults {
        summary: RunSummary {
            total_files: files.len(),
            passed_files,
            error_files,
            warning_files,
            total_errors,
            total_warnings,
            total_info,
            duration_ms: started.elapsed().as_millis() as u64,
        },
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut f = fs::File::create(path).unwrap();
        write!(f, "{}", contents).unwrap();
    }

    fn service_file(title_len: usize, seed: &str) -> String {
        format!(
            concat!(
                "---\n",
                "title: \"{}\"\n",
                "description: \"Call us today for a free quote on {} work anywhere in the region, with fixed pricing and tidy sites guaranteed every time.\"\n",
                "keywords:\n  - {}\n  - hire\n  - local\n",
                "---\n",
                "Our {} crews work across town and finish on time. \
                 The {} price is agreed before work starts. \
                 Ask about {} help for your next project today.\n",
            ),
            "x".repeat(title_len),
            seed,
            seed,
            seed,
            seed,
            seed
        )
    }

    #[test]
    fn test_missing_dirs_yield_zero_files() {
        let dir = tempdir().unwrap();
        let agg = run_validators(&dir.path().join("content"), &RunOptions::default()).unwrap();
        assert_eq!(agg.summary.total_files, 0);
        assert!(agg.results.is_empty());
    }

    #[test]
    fn test_explicit_missing_file_is_fatal() {
        let dir = tempdir().unwrap();
        let options = RunOptions {
            file: Some(dir.path().join("content/services/nope.mdx")),
            ..RunOptions::default()
        };
        let err = run_validators(&dir.path().join("content"), &options).unwrap_err();
        assert!(matches!(err, RunError::FileNotFound(_)));
        assert!(err.to_string().starts_with("File not found"));
    }

    #[test]
    fn test_bucket_partition_invariant() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("content");
        write_file(&root.join("services/a.mdx"), &service_file(40, "scaffolding"));
        write_file(&root.join("services/b.mdx"), &service_file(40, "guttering"));
        write_file(&root.join("locations/c.mdx"), &service_file(40, "roofing"));

        let agg = run_validators(&root, &RunOptions::default()).unwrap();
        let s = &agg.summary;
        assert_eq!(s.total_files, 3);
        assert_eq!(
            s.total_files,
            s.passed_files + s.error_files + s.warning_files
        );
        assert_eq!(agg.results.len(), 3);
    }

    #[test]
    fn test_passed_iff_no_error_severity() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("content");
        // Title of 10 chars is under the 30-char minimum.
        write_file(&root.join("services/short.mdx"), &service_file(10, "scaffolding"));

        // With seo severity raised to error the file must land in the
        // error bucket and every seo result must be failed.
        let mut overrides = BTreeMap::new();
        overrides.insert(
            ValidatorKind::Seo,
            ValidatorOverride {
                enabled: None,
                severity: Some("error".into()),
                thresholds: BTreeMap::new(),
            },
        );
        let options = RunOptions {
            overrides,
            ..RunOptions::default()
        };
        let agg = run_validators(&root, &options).unwrap();
        assert_eq!(agg.summary.error_files, 1);
        assert!(agg.summary.total_errors >= 1);
        for results in agg.results.values() {
            for result in results {
                let has_error = result
                    .issues
                    .iter()
                    .any(|i| i.severity == Severity::Error);
                assert_eq!(result.passed, !has_error);
            }
        }
    }

    #[test]
    fn test_validator_subset_and_disabled_are_silent() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("content");
        write_file(&root.join("services/a.mdx"), &service_file(40, "scaffolding"));

        let options = RunOptions {
            validators: Some(vec![ValidatorKind::Seo]),
            ..RunOptions::default()
        };
        let agg = run_validators(&root, &options).unwrap();
        let results = agg.results.values().next().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].validator, "seo");

        // Disabling the only requested validator yields zero results,
        // not an error.
        let mut overrides = BTreeMap::new();
        overrides.insert(
            ValidatorKind::Seo,
            ValidatorOverride {
                enabled: Some(false),
                severity: None,
                thresholds: BTreeMap::new(),
            },
        );
        let options = RunOptions {
            validators: Some(vec![ValidatorKind::Seo]),
            overrides,
            ..RunOptions::default()
        };
        let agg = run_validators(&root, &options).unwrap();
        assert!(agg.results.values().next().unwrap().is_empty());
        assert_eq!(agg.summary.passed_files, 1);
    }

    #[test]
    fn test_runs_are_deterministic_modulo_duration() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("content");
        write_file(&root.join("services/a.mdx"), &service_file(40, "scaffolding"));
        write_file(&root.join("locations/b.mdx"), &service_file(40, "scaffolding"));

        let first = run_validators(&root, &RunOptions::default()).unwrap();
        let second = run_validators(&root, &RunOptions::default()).unwrap();
        assert_eq!(first.summary.total_files, second.summary.total_files);
        assert_eq!(first.summary.total_errors, second.summary.total_errors);
        assert_eq!(first.summary.total_warnings, second.summary.total_warnings);
        assert_eq!(first.summary.total_info, second.summary.total_info);
        for (path, results) in &first.results {
            let other = &second.results[path];
            assert_eq!(results.len(), other.len());
            for (a, b) in results.iter().zip(other) {
                assert_eq!(a.passed, b.passed);
                assert_eq!(a.metrics, b.metrics);
                let codes_a: Vec<&str> = a.issues.iter().map(|i| i.code.as_str()).collect();
                let codes_b: Vec<&str> = b.issues.iter().map(|i| i.code.as_str()).collect();
                assert_eq!(codes_a, codes_b);
            }
        }
    }

    #[test]
    fn test_uniqueness_cache_reset_between_runs() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("content");
        write_file(&root.join("services/a.mdx"), &service_file(40, "scaffolding"));

        // Two consecutive full runs: the second must not see the first
        // run's fingerprints, so the single file is never a duplicate.
        for _ in 0..2 {
            let agg = run_validators(&root, &RunOptions::default()).unwrap();
            let results = agg.results.values().next().unwrap();
            let uniq = results
                .iter()
                .find(|r| r.validator == "uniqueness")
                .unwrap();
            assert!(!uniq.issues.iter().any(|i| i.code == "UNIQ_001"));
        }
    }

    #[test]
    fn test_shared_about_paragraph_flags_second_file() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("content");
        let shared_about = concat!(
            "about:\n",
            "  story: >\n",
            "    The firm began as a two-man crew and grew through word of mouth.\n",
            "    Every operative completes accredited training before stepping on a\n",
            "    platform, and every project carries the same written guarantee from\n",
            "    the first site visit through to the final handover inspection.\n",
        );
        let page = |name: &str, about: &str| {
            format!(
                "---\ntitle: \"Scaffolding in {name} for every project\"\n{about}---\n{name} body.\n"
            )
        };
        write_file(
            &root.join("locations/aberford.mdx"),
            &page("Aberford", shared_about),
        );
        write_file(
            &root.join("locations/bardsey.mdx"),
            &page("Bardsey", shared_about),
        );
        write_file(
            &root.join("locations/colton.mdx"),
            &page(
                "Colton",
                "about:\n  story: Colton jobs are priced per elevation and booked by phone.\n",
            ),
        );

        let options = RunOptions {
            validators: Some(vec![ValidatorKind::Uniqueness]),
            ..RunOptions::default()
        };
        let agg = run_validators(&root, &options).unwrap();

        let flagged: Vec<&String> = agg
            .results
            .iter()
            .filter(|(_, results)| {
                results
                    .iter()
                    .any(|r| r.issues.iter().any(|i| i.code == "UNIQ_001"))
            })
            .map(|(path, _)| path)
            .collect();
        assert_eq!(flagged.len(), 1);
        assert!(flagged[0].ends_with("bardsey.mdx"));
        // The issue on the second file cites the first.
        let issue = agg.results[flagged[0]][0]
            .issues
            .iter()
            .find(|i| i.code == "UNIQ_001")
            .unwrap();
        assert!(issue.message.contains("aberford.mdx"));
    }
}
