//! CLI argument parsing via `clap`.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "content-lint",
    version,
    about = "Content quality checks for generated MDX marketing sites",
    long_about = "content-lint — readability, SEO, and uniqueness checks over MDX content.\n\nExit code is 0 when no error-severity issues are found; warnings never fail the build.\n\nConfiguration precedence: CLI > content-lint.toml > defaults.",
    after_help = "Examples:\n  content-lint\n  content-lint --validators=seo,readability\n  content-lint --file content/services/scaffolding.mdx --verbose\n  content-lint --json > report.json"
)]
/// Top-level CLI options.
pub struct Cli {
    /// Comma-separated validator subset (default: all)
    #[arg(long, value_delimiter = ',')]
    pub validators: Option<Vec<String>>,

    /// Validate a single file instead of the content tree
    #[arg(long)]
    pub file: Option<String>,

    /// Content root containing services/ and locations/
    #[arg(long)]
    pub content_dir: Option<String>,

    /// Emit one JSON object instead of the text report
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub json: bool,

    /// Show suggestions and raw metrics per issue
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub verbose: bool,
}
