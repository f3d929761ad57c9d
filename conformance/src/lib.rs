//! serializedform conformance suite.
//!
//! Checks the parsers against fixture sets and embedded cases, independently
//! of the unit tests, so the same checks can run against new fixture
//! directories from the command line.
//!
//! # Checks
//!
//! | Validator | What it enforces |
//! |-----------|------------------|
//! | `resolver` | every advertised content type resolves, parameters are ignored |
//! | `cases/equivalence` | embedded graphs are equal across all five syntaxes |
//! | `fixtures/equivalence` | each fixture group matches its `.nt` reference |
//! | `fixtures/negative` | every document under `bad/` is a syntax error |
//! | `oracle/sophia` | Turtle and N-Triples fixtures agree with sophia |
//!
//! # Entry Point
//!
//! ```no_run
//! use serializedform_conformance::run_all;
//! use std::path::Path;
//!
//! let report = run_all(Path::new("parser/tests/data")).expect("Failed to run conformance");
//! assert!(report.all_passed());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod cases;
pub mod fixture;
pub mod report;
pub mod validators;

use std::path::Path;

pub use fixture::{Fixture, FixtureError, FixtureSet};
pub use report::{ConformanceReport, Severity, TestResult};

/// Runs every validator and returns the aggregated report.
///
/// Order:
/// 1. Content-type resolution
/// 2. Embedded cases
/// 3. Fixture groups under `fixtures`
/// 4. Negative fixtures under `fixtures/bad`
/// 5. sophia cross-check of the Turtle and N-Triples fixtures
///
/// # Errors
///
/// Returns an error only if a file system operation fails.
pub fn run_all(fixtures: &Path) -> anyhow::Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    report.extend(validators::resolver::validate());
    report.extend(validators::cases::validate());

    let set = FixtureSet::discover(fixtures)?;
    report.extend(validators::equivalence::validate(&set)?);
    report.extend(validators::negative::validate(&set)?);
    report.extend(validators::oracle::validate(&set)?);

    tracing::debug!(
        results = report.results.len(),
        failures = report.failure_count(),
        "conformance run finished"
    );
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests_unit {
    use super::*;
    use std::path::PathBuf;

    fn parser_fixtures() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../parser/tests/data")
    }

    #[test]
    fn parser_fixtures_conform() {
        let report = run_all(&parser_fixtures()).unwrap();
        let failures: Vec<_> = report.results.iter().filter(|r| r.is_failure()).collect();
        assert!(failures.is_empty(), "conformance failures: {failures:#?}");
    }

    #[test]
    fn fixture_set_is_split_by_directory() {
        let set = FixtureSet::discover(&parser_fixtures()).unwrap();
        assert_eq!(set.groups["test-04"].len(), 5);
        assert_eq!(set.groups["test-05"].len(), 1);
        assert!(set.negative.len() >= 8);
        assert!(set.negative.iter().all(|f| f.path.parent().unwrap().ends_with("bad")));
    }

    #[test]
    fn missing_directory_is_an_error() {
        assert!(run_all(Path::new("/nonexistent/fixtures")).is_err());
    }
}
