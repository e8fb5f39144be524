//! Built-in validator defaults, config file discovery, and effective
//! settings resolution.
//!
//! `content-lint.toml|yaml|yml` is read from the start directory or the
//! closest ancestor and merged with CLI flags. Precedence:
//! CLI > config file > built-in defaults. Validator overrides merge
//! field-by-field; thresholds never replace the defaults wholesale.

use crate::models::{Severity, ValidatorConfig, ValidatorOverride};
use crate::validators::ValidatorKind;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Built-in defaults for one validator. Every threshold a check reads is
/// present here, so merged configs are always fully populated.
pub fn default_config(kind: ValidatorKind) -> ValidatorConfig {
    let mut thresholds = BTreeMap::new();
    let severity;
    match kind {
        ValidatorKind::Readability => {
            severity = Severity::Warning;
            for (key, value) in [
                ("fleschKincaidGradeMin", 4.0),
                ("fleschKincaidGradeMax", 12.0),
                ("fleschReadingEaseMin", 40.0),
                ("fleschReadingEaseMax", 90.0),
                ("avgSentenceLengthMin", 8.0),
                ("avgSentenceLengthMax", 25.0),
                ("complexWordPercentMax", 15.0),
            ] {
                thresholds.insert(key.to_string(), value);
            }
        }
        ValidatorKind::Seo => {
            severity = Severity::Warning;
            for (key, value) in [
                ("titleLengthMin", 30.0),
                ("titleLengthMax", 60.0),
                ("descriptionLengthMin", 120.0),
                ("descriptionLengthMax", 160.0),
                ("keywordDensityMin", 0.5),
                ("keywordDensityMax", 3.0),
                ("keywordCountMin", 3.0),
                ("keywordCountMax", 10.0),
            ] {
                thresholds.insert(key.to_string(), value);
            }
        }
        ValidatorKind::Uniqueness => {
            severity = Severity::Warning;
            for (key, value) in [
                ("ngramSize", 3.0),
                ("similarityThreshold", 70.0),
                ("boilerplateMinPhraseLength", 5.0),
                ("boilerplateMinOccurrences", 3.0),
            ] {
                thresholds.insert(key.to_string(), value);
            }
        }
    }
    ValidatorConfig {
        enabled: true,
        severity,
        thresholds,
    }
}

/// Merge a partial override into the defaults for a validator.
/// Thresholds merge key-by-key; unknown severity tokens are ignored.
pub fn merged_config(kind: ValidatorKind, ov: Option<&ValidatorOverride>) -> ValidatorConfig {
    let mut config = default_config(kind);
    let Some(ov) = ov else {
        return config;
    };
    if let Some(enabled) = ov.enabled {
        config.enabled = enabled;
    }
    if let Some(sev) = ov.severity.as_deref().and_then(Severity::parse) {
        config.severity = sev;
    }
    for (key, value) in &ov.thresholds {
        config.thresholds.insert(key.clone(), *value);
    }
    config
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `content-lint.toml|yaml`.
pub struct FileConfig {
    pub content_dir: Option<String>,
    pub output: Option<String>,
    #[serde(default)]
    pub validators: Option<BTreeMap<String, ValidatorOverride>>,
}

/// Walk upward from `start` until a config file or a `.git` directory is
/// found; otherwise return `start`.
pub fn detect_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("content-lint.toml").exists()
            || cur.join("content-lint.yaml").exists()
            || cur.join("content-lint.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `FileConfig` from `content-lint.toml` or `content-lint.yaml|yml`
/// if present.
pub fn load_config(root: &Path) -> Option<FileConfig> {
    let toml_path = root.join("content-lint.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        let cfg: FileConfig = toml::from_str(&s).ok()?;
        return Some(cfg);
    }
    for yml in ["content-lint.yaml", "content-lint.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            let cfg: FileConfig = serde_yaml::from_str(&s).ok()?;
            return Some(cfg);
        }
    }
    None
}

#[derive(Debug, Clone)]
/// Fully-resolved settings used by the binary after applying precedence.
pub struct Effective {
    pub root: PathBuf,
    pub content_dir: PathBuf,
    pub json: bool,
    /// Per-validator overrides from the config file, keyed by kind.
    pub overrides: BTreeMap<ValidatorKind, ValidatorOverride>,
}

/// Resolve `Effective` by merging CLI flags, discovered config, and
/// defaults. Unknown validator names in the config file are ignored here;
/// the CLI validates its own `--validators` list.
pub fn resolve_effective(
    cli_content_dir: Option<&str>,
    cli_json: bool,
) -> Effective {
    let start = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let root = detect_root(&start);
    let cfg = load_config(&root).unwrap_or_default();

    let content_dir = cli_content_dir
        .map(|s| s.to_string())
        .or(cfg.content_dir)
        .unwrap_or_else(|| "content".to_string());
    let content_dir = {
        let p = PathBuf::from(&content_dir);
        if p.is_absolute() {
            p
        } else {
            start.join(p)
        }
    };

    let json = cli_json || cfg.output.as_deref() == Some("json");

    let mut overrides = BTreeMap::new();
    for (name, ov) in cfg.validators.unwrap_or_default() {
        if let Some(kind) = ValidatorKind::from_name(&name) {
            overrides.insert(kind, ov);
        }
    }

    Effective {
        root,
        content_dir,
        json,
        overrides,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_fully_populated() {
        for kind in ValidatorKind::ALL {
            let config = default_config(kind);
            assert!(config.enabled);
            assert!(!config.thresholds.is_empty());
        }
        let seo = default_config(ValidatorKind::Seo);
        assert_eq!(seo.threshold("titleLengthMin"), Some(30.0));
        assert_eq!(seo.threshold("titleLengthMax"), Some(60.0));
    }

    #[test]
    fn test_merge_keeps_unmentioned_thresholds() {
        let ov = ValidatorOverride {
            enabled: None,
            severity: Some("error".into()),
            thresholds: [("titleLengthMax".to_string(), 70.0)].into_iter().collect(),
        };
        let merged = merged_config(ValidatorKind::Seo, Some(&ov));
        assert_eq!(merged.severity, Severity::Error);
        assert_eq!(merged.threshold("titleLengthMax"), Some(70.0));
        // Untouched defaults survive the merge.
        assert_eq!(merged.threshold("titleLengthMin"), Some(30.0));
        assert_eq!(merged.threshold("keywordDensityMax"), Some(3.0));
        assert!(merged.enabled);
    }

    #[test]
    fn test_merge_ignores_unknown_severity() {
        let ov = ValidatorOverride {
            enabled: Some(false),
            severity: Some("fatal".into()),
            thresholds: BTreeMap::new(),
        };
        let merged = merged_config(ValidatorKind::Readability, Some(&ov));
        assert!(!merged.enabled);
        assert_eq!(merged.severity, Severity::Warning);
    }

    #[test]
    fn test_load_toml_config_with_validator_overrides() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("content-lint.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
content_dir = "site/content"
output = "json"

[validators.seo]
severity = "error"

[validators.seo.thresholds]
titleLengthMax = 70
"#
        )
        .unwrap();

        let cfg = load_config(root).unwrap();
        assert_eq!(cfg.content_dir.as_deref(), Some("site/content"));
        assert_eq!(cfg.output.as_deref(), Some("json"));
        let ov = &cfg.validators.unwrap()["seo"];
        assert_eq!(ov.severity.as_deref(), Some("error"));
        assert_eq!(ov.thresholds["titleLengthMax"], 70.0);
    }

    #[test]
    fn test_load_yaml_config() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("content-lint.yaml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
content_dir: content
validators:
  uniqueness:
    enabled: false
"#
        )
        .unwrap();
        let cfg = load_config(root).unwrap();
        let ov = &cfg.validators.unwrap()["uniqueness"];
        assert_eq!(ov.enabled, Some(false));
    }

    #[test]
    fn test_detect_root_walks_up() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::File::create(root.join("content-lint.toml")).unwrap();
        let nested = root.join("a/b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(detect_root(&nested), root.to_path_buf());
    }
}
