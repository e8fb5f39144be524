//! Report rendering for validation runs.
//!
//! Supports a human text report (default) and a single-object JSON form
//! `{"summary": {...}, "results": {path: [results]}}`. Colors are
//! disabled in JSON mode and under `NO_COLOR`.

use crate::models::{AggregatedResults, Severity, ValidationResult};
use crate::utils::use_colors;
use owo_colors::OwoColorize;
use serde_json::Value as JsonVal;
use std::path::Path;

/// Compose the JSON report object (pure, for tests and snapshots).
pub fn compose_report_json(agg: &AggregatedResults) -> JsonVal {
    // AggregatedResults serializes directly as {summary, results}.
    serde_json::to_value(agg).unwrap_or(JsonVal::Null)
}

/// Print the full report in the requested format.
pub fn print_report(agg: &AggregatedResults, json: bool, verbose: bool) {
    if json {
        match serde_json::to_string_pretty(&compose_report_json(agg)) {
            Ok(s) => println!("{}", s),
            Err(e) => println!("{{\"error\": \"{}\"}}", e),
        }
        return;
    }
    let color = use_colors(json);
    let cwd = std::env::current_dir().ok();

    for (path, results) in &agg.results {
        let display = display_path(path, cwd.as_deref());
        let header = match results.first() {
            Some(first) => format!("{} ({})", display, first.content_type),
            None => display.clone(),
        };
        if color {
            println!("{}", header.bold());
        } else {
            println!("{}", header);
        }
        for result in results {
            print_result(result, color, verbose);
        }
        println!();
    }

    let s = &agg.summary;
    let summary = format!(
        "— Summary — files={} passed={} warnings={} errors={} | issues: errors={} warnings={} infos={} ({}ms)",
        s.total_files,
        s.passed_files,
        s.warning_files,
        s.error_files,
        s.total_errors,
        s.total_warnings,
        s.total_info,
        s.duration_ms
    );
    if color {
        println!("{}", summary.bold());
    } else {
        println!("{}", summary);
    }
}

fn display_path(path: &str, cwd: Option<&Path>) -> String {
    if let Some(cwd) = cwd {
        if let Some(rel) = pathdiff::diff_paths(path, cwd) {
            let rel = rel.to_string_lossy().to_string();
            if !rel.starts_with("..") {
                return rel;
            }
        }
    }
    path.to_string()
}

fn print_result(result: &ValidationResult, color: bool, verbose: bool) {
    let worst = result
        .issues
        .iter()
        .map(|i| i.severity)
        .min();
    let glyph = match worst {
        Some(Severity::Error) => {
            if color {
                "✖".red().to_string()
            } else {
                "✖".to_string()
            }
        }
        Some(Severity::Warning) => {
            if color {
                "▲".yellow().to_string()
            } else {
                "▲".to_string()
            }
        }
        Some(Severity::Info) => {
            if color {
                "◆".blue().to_string()
            } else {
                "◆".to_string()
            }
        }
        None => {
            if color {
                "✓".green().to_string()
            } else {
                "✓".to_string()
            }
        }
    };
    println!(
        "  {} {}: {} issue(s) ({}ms)",
        glyph,
        result.validator,
        result.issues.len(),
        result.duration_ms
    );
    for issue in &result.issues {
        let sev = match issue.severity {
            Severity::Error => {
                if color {
                    "⟦error⟧".red().bold().to_string()
                } else {
                    "⟦error⟧".to_string()
                }
            }
            Severity::Warning => {
                if color {
                    "⟦warn⟧".yellow().bold().to_string()
                } else {
                    "⟦warn⟧".to_string()
                }
            }
            Severity::Info => {
                if color {
                    "⟦info⟧".blue().bold().to_string()
                } else {
                    "⟦info⟧".to_string()
                }
            }
        };
        let field = issue
            .field
            .as_ref()
            .map(|f| format!(" (field: {})", f))
            .unwrap_or_default();
        println!("    {} ❲{}❳ {}{}", sev, issue.code, issue.message, field);
        if verbose {
            if let Some(suggestion) = &issue.suggestion {
                println!("      ↳ {}", suggestion);
            }
        }
    }
    if verbose && !result.metrics.is_empty() {
        let metrics: Vec<String> = result
            .metrics
            .iter()
            .map(|(k, v)| format!("{}={:.2}", k, v))
            .collect();
        println!("      metrics: {}", metrics.join(" "));
    }
}
