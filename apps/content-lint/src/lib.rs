//! content-lint core library.
//!
//! Programmatic API for running content quality validators over a corpus
//! of MDX marketing files and aggregating the results.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Validator defaults, config file discovery, and merging.
//! - `content`: MDX parsing, discovery, and readable-text extraction.
//! - `models`: Data models for content, issues, results, and summaries.
//! - `output`: Human/JSON report printers.
//! - `runner`: Corpus pass, per-file validation, aggregation.
//! - `validators`: The validator trait, registry, and implementations.
//! - `utils`: Supporting helpers.
pub mod cli;
pub mod config;
pub mod content;
pub mod models;
pub mod output;
pub mod runner;
pub mod utils;
pub mod validators;
