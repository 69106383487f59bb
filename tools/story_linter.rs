//! Story Linter — validates story catalogs before they ship.
//!
//! Usage: story_linter <catalog>... [--width <cols>]

use clap::Parser;
use mad_libs::core::catalog::{lint, CatalogDocument};
use mad_libs::core::format::DISPLAY_WIDTH;
use std::path::PathBuf;
use std::process::ExitCode;

/// Check story catalogs for blank/placeholder mismatches and other problems.
#[derive(Parser, Debug)]
#[command(name = "story_linter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Catalog files to check (.json or .ron).
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Titles wider than this are reported.
    #[arg(short, long, default_value_t = DISPLAY_WIDTH)]
    width: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut total_errors = 0;
    let mut total_warnings = 0;

    for path in &cli.paths {
        println!("=== {} ===", path.display());

        let doc = match CatalogDocument::load(path) {
            Ok(doc) => doc,
            Err(e) => {
                println!("ERROR: {}", e);
                total_errors += 1;
                continue;
            }
        };

        let stories: usize = doc.themes.iter().map(|t| t.stories.len()).sum();
        println!("Loaded {} themes, {} stories", doc.themes.len(), stories);

        let report = lint(&doc, cli.width);
        if report.is_clean() {
            println!("All checks passed!");
        }
        for warning in &report.warnings {
            println!("WARNING: {}", warning);
        }
        for error in &report.errors {
            println!("ERROR: {}", error);
        }
        println!();

        total_errors += report.errors.len();
        total_warnings += report.warnings.len();
    }

    println!(
        "Summary: {} errors, {} warnings",
        total_errors, total_warnings
    );

    if total_errors == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
