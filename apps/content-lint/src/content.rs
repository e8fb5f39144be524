//! MDX content parsing, discovery, and readable-text extraction.
//!
//! Content lives as `<dir>/services/*.mdx` and `<dir>/locations/*.mdx`.
//! Each file carries a YAML frontmatter header between `---` fences,
//! followed by a free-form prose body. The frontmatter shape is open
//! ended; extraction degrades gracefully when fields are absent.

use crate::models::{ContentType, ParsedContent};
use crate::runner::RunError;
use glob::glob;
use serde_yaml::Value as Yaml;
use std::fs;
use std::path::{Path, PathBuf};

/// Parse one MDX file into frontmatter and body.
///
/// Malformed YAML or an unterminated `---` fence is a hard error; content
/// integrity problems block CI rather than being silently skipped. A file
/// with no frontmatter block at all is treated as body-only.
pub fn parse_mdx(path: &Path) -> Result<ParsedContent, RunError> {
    let raw = fs::read_to_string(path).map_err(|source| RunError::Io {
        file: path.to_path_buf(),
        source,
    })?;
    let (frontmatter, body) = split_frontmatter(path, &raw)?;
    Ok(ParsedContent {
        file_path: path.to_path_buf(),
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        content_type: ContentType::from_path(path),
        frontmatter,
        body,
    })
}

fn split_frontmatter(path: &Path, raw: &str) -> Result<(serde_yaml::Mapping, String), RunError> {
    let Some(rest) = raw.strip_prefix("---") else {
        return Ok((serde_yaml::Mapping::new(), raw.to_string()));
    };
    let Some(rest) = rest.strip_prefix('\n') else {
        // Something like "---foo"; not a fence, treat as body.
        return Ok((serde_yaml::Mapping::new(), raw.to_string()));
    };
    let Some(end) = find_closing_fence(rest) else {
        return Err(RunError::UnterminatedFrontmatter(path.to_path_buf()));
    };
    let header = &rest[..end.0];
    let body = rest[end.1..].to_string();
    let value: Yaml =
        serde_yaml::from_str(header).map_err(|source| RunError::Frontmatter {
            file: path.to_path_buf(),
            source,
        })?;
    let mapping = match value {
        Yaml::Mapping(m) => m,
        Yaml::Null => serde_yaml::Mapping::new(),
        _ => {
            return Err(RunError::FrontmatterShape(path.to_path_buf()));
        }
    };
    Ok((mapping, body))
}

/// Locate the closing `---` fence. Returns (header end, body start)
/// byte offsets into the text following the opening fence.
fn find_closing_fence(rest: &str) -> Option<(usize, usize)> {
    let mut offset = 0usize;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((offset, offset + line.len()));
        }
        offset += line.len();
    }
    None
}

/// Discover every content file under `<dir>/services` and
/// `<dir>/locations`, in that order. Missing directories contribute zero
/// files; a partially-scaffolded site is not an error. Within each
/// directory the glob order is alphabetical, so the corpus pass is
/// deterministic.
pub fn discover_content(content_dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for sub in ["services", "locations"] {
        let pattern = content_dir.join(sub).join("*.mdx");
        let pattern = pattern.to_string_lossy().to_string();
        if let Ok(entries) = glob(&pattern) {
            for entry in entries.flatten() {
                files.push(entry);
            }
        }
    }
    files
}

/// Aggregate every human-readable frontmatter field with the body.
///
/// Most of the marketing copy in this content model lives in the
/// frontmatter (hero, about, FAQs, specialist cards), so readability and
/// keyword metrics must see it too, not just the body prose. Absent or
/// mistyped fields are skipped silently.
pub fn extract_readable_text(content: &ParsedContent) -> String {
    let mut parts: Vec<String> = Vec::new();
    let fm = &content.frontmatter;

    push_str_field(&mut parts, fm, "description");

    if let Some(Yaml::Mapping(hero)) = get(fm, "hero") {
        for key in ["title", "heading", "subheading", "description"] {
            push_str_field(&mut parts, hero, key);
        }
    }

    if let Some(about) = get(fm, "about") {
        collect_strings(about, &mut parts);
    }

    if let Some(Yaml::Sequence(faqs)) = get(fm, "faqs") {
        for faq in faqs {
            if let Yaml::Mapping(m) = faq {
                push_str_field(&mut parts, m, "question");
                push_str_field(&mut parts, m, "answer");
            }
        }
    }

    if let Some(Yaml::Sequence(specialists)) = get(fm, "specialists") {
        for card in specialists {
            if let Yaml::Mapping(m) = card {
                push_str_field(&mut parts, m, "description");
            }
        }
    }

    if !content.body.trim().is_empty() {
        parts.push(content.body.trim().to_string());
    }
    parts.join(" ")
}

fn get<'a>(m: &'a serde_yaml::Mapping, key: &str) -> Option<&'a Yaml> {
    m.get(Yaml::String(key.to_string()))
}

fn push_str_field(parts: &mut Vec<String>, m: &serde_yaml::Mapping, key: &str) {
    if let Some(s) = get(m, key).and_then(|v| v.as_str()) {
        if !s.trim().is_empty() {
            parts.push(s.trim().to_string());
        }
    }
}

/// Collect every string leaf under a value. Covers narrative `about`
/// sections that mix prose fields with lists of items.
fn collect_strings(value: &Yaml, parts: &mut Vec<String>) {
    match value {
        Yaml::String(s) => {
            if !s.trim().is_empty() {
                parts.push(s.trim().to_string());
            }
        }
        Yaml::Sequence(seq) => {
            for v in seq {
                collect_strings(v, parts);
            }
        }
        Yaml::Mapping(m) => {
            for (_, v) in m {
                collect_strings(v, parts);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut f = fs::File::create(path).unwrap();
        write!(f, "{}", contents).unwrap();
    }

    #[test]
    fn test_parse_mdx_frontmatter_and_body() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("content/services/scaffolding.mdx");
        write_file(
            &path,
            "---\ntitle: Scaffolding Hire\nkeywords:\n  - scaffolding\n---\n\nWe erect scaffolds.\n",
        );
        let parsed = parse_mdx(&path).unwrap();
        assert_eq!(parsed.content_type, ContentType::Service);
        assert_eq!(parsed.field_str("title"), Some("Scaffolding Hire"));
        assert!(parsed.body.contains("We erect scaffolds."));
    }

    #[test]
    fn test_parse_mdx_without_frontmatter_is_body_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.mdx");
        write_file(&path, "Just prose, no header.\n");
        let parsed = parse_mdx(&path).unwrap();
        assert!(parsed.frontmatter.is_empty());
        assert!(parsed.body.contains("Just prose"));
    }

    #[test]
    fn test_parse_mdx_unterminated_fence_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.mdx");
        write_file(&path, "---\ntitle: Oops\n\nBody without closing fence.\n");
        assert!(matches!(
            parse_mdx(&path),
            Err(RunError::UnterminatedFrontmatter(_))
        ));
    }

    #[test]
    fn test_parse_mdx_malformed_yaml_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.mdx");
        write_file(&path, "---\ntitle: [unclosed\n---\nBody.\n");
        assert!(matches!(
            parse_mdx(&path),
            Err(RunError::Frontmatter { .. })
        ));
    }

    #[test]
    fn test_discover_content_tolerates_missing_dirs() {
        let dir = tempdir().unwrap();
        // Only services exists; locations is absent.
        write_file(
            &dir.path().join("content/services/a.mdx"),
            "---\ntitle: A\n---\nBody.\n",
        );
        let files = discover_content(&dir.path().join("content"));
        assert_eq!(files.len(), 1);
        let none = discover_content(&dir.path().join("nowhere"));
        assert!(none.is_empty());
    }

    #[test]
    fn test_discover_content_orders_services_before_locations() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("content");
        write_file(&root.join("locations/leeds.mdx"), "---\n---\nLeeds.\n");
        write_file(&root.join("services/b.mdx"), "---\n---\nB.\n");
        write_file(&root.join("services/a.mdx"), "---\n---\nA.\n");
        let files = discover_content(&root);
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.mdx", "b.mdx", "leeds.mdx"]);
    }

    #[test]
    fn test_extract_readable_text_walks_frontmatter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("content/locations/leeds.mdx");
        write_file(
            &path,
            concat!(
                "---\n",
                "title: Scaffolding in Leeds\n",
                "description: Trusted local scaffolding teams.\n",
                "hero:\n",
                "  heading: Scaffolding You Can Rely On\n",
                "  subheading: Serving Leeds for 20 years\n",
                "about:\n",
                "  intro: We are a family firm.\n",
                "  points:\n",
                "    - Fully insured\n",
                "    - CITB trained\n",
                "faqs:\n",
                "  - question: Do you offer free quotes?\n",
                "    answer: Yes, always.\n",
                "specialists:\n",
                "  - name: Jo\n",
                "    description: Residential scaffolds.\n",
                "---\n",
                "Body prose here.\n",
            ),
        );
        let parsed = parse_mdx(&path).unwrap();
        let text = extract_readable_text(&parsed);
        for needle in [
            "Trusted local scaffolding teams.",
            "Scaffolding You Can Rely On",
            "Serving Leeds for 20 years",
            "We are a family firm.",
            "Fully insured",
            "CITB trained",
            "Do you offer free quotes?",
            "Yes, always.",
            "Residential scaffolds.",
            "Body prose here.",
        ] {
            assert!(text.contains(needle), "missing: {}", needle);
        }
        // Specialist names are not prose.
        assert!(!text.contains("Jo"));
    }
}
