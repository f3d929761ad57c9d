//! `sf-conformance`: runs the serializedform conformance suite.
//!
//! Checks content-type resolution, the embedded multi-syntax cases, every
//! fixture group under the fixture directory against its N-Triples
//! reference, the negative fixtures under `bad/`, and a sophia cross-check.
//!
//! **Usage:**
//! ```text
//! sf-conformance [--fixtures <path>]
//! ```
//!
//! Exits non-zero if any check fails. Set `RUST_LOG=debug` for parser traces.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use serializedform_conformance::{run_all, Severity};
use tracing_subscriber::EnvFilter;

/// Run the serializedform conformance suite.
#[derive(Parser)]
#[command(
    name = "sf-conformance",
    about = "Check the RDF parsers against fixture sets and embedded cases"
)]
struct Args {
    /// Fixture directory; documents sharing a stem form one group.
    #[arg(long, default_value = "parser/tests/data")]
    fixtures: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let report = run_all(&args.fixtures)
        .with_context(|| format!("Failed to run conformance over {}", args.fixtures.display()))?;

    println!("serializedform Conformance Report");
    println!("=================================");
    println!();

    for result in &report.results {
        println!("[{}] {}: {}", result.severity, result.validator, result.message);
        for detail in &result.details {
            println!("       {detail}");
        }
    }

    let failed = report.count(Severity::Failure);
    println!();
    println!(
        "Summary: {} passed, {} warnings, {} failed",
        report.count(Severity::Pass),
        report.count(Severity::Warning),
        failed
    );

    if failed > 0 {
        eprintln!("Conformance FAILED: {failed} check(s) did not pass.");
        process::exit(1);
    }

    println!("Conformance PASSED.");
    Ok(())
}
