//! content-lint CLI binary entry point.
//! Resolves configuration, runs the corpus pass, prints the report, and
//! derives the exit code from the error count.

mod cli;
mod config;
mod content;
mod models;
mod output;
mod runner;
mod utils;
mod validators;

use clap::Parser;
use cli::Cli;
use runner::RunOptions;
use serde_json::json;
use std::path::PathBuf;
use validators::ValidatorKind;

fn main() {
    let cli = Cli::parse();
    let eff = config::resolve_effective(cli.content_dir.as_deref(), cli.json);

    if !eff.json && config::load_config(&eff.root).is_none() {
        eprintln!(
            "{} {}",
            utils::note_prefix(),
            "No content-lint.toml found; using defaults."
        );
    }

    // Resolve the validator subset before touching the filesystem, so an
    // unknown name is reported up front.
    let validators = match &cli.validators {
        Some(names) => {
            let mut kinds = Vec::new();
            for name in names {
                match ValidatorKind::from_name(name) {
                    Some(kind) => kinds.push(kind),
                    None => {
                        let available: Vec<&str> =
                            ValidatorKind::ALL.iter().map(|k| k.name()).collect();
                        let msg = format!(
                            "Unknown validator '{}'. Available: {}",
                            name,
                            available.join(", ")
                        );
                        if eff.json {
                            println!("{}", json!({ "error": msg }));
                        } else {
                            eprintln!("{} {}", utils::error_prefix(), msg);
                        }
                        std::process::exit(1);
                    }
                }
            }
            Some(kinds)
        }
        None => None,
    };

    let options = RunOptions {
        validators,
        file: cli.file.as_ref().map(PathBuf::from),
        overrides: eff.overrides.clone(),
    };

    match runner::run_validators(&eff.content_dir, &options) {
        Ok(agg) => {
            output::print_report(&agg, eff.json, cli.verbose);
            if agg.summary.total_errors > 0 {
                std::process::exit(1);
            }
        }
        Err(e) => {
            if eff.json {
                println!("{}", json!({ "error": e.to_string() }));
            } else {
                eprintln!("{} {}", utils::error_prefix(), e);
            }
            std::process::exit(1);
        }
    }
}
