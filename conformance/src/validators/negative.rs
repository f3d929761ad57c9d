//! Negative syntax checks: every document under `bad/` must be rejected with
//! a syntax error.

use anyhow::Result;
use serializedform::ParseError;

use crate::fixture::FixtureSet;
use crate::report::{ConformanceReport, TestResult};

const VALIDATOR: &str = "fixtures/negative";

/// Parses every negative fixture and expects [`ParseError::Syntax`].
///
/// # Errors
///
/// Returns an error if a fixture file cannot be opened.
pub fn validate(set: &FixtureSet) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    if set.negative.is_empty() {
        report.push(TestResult::warn(VALIDATOR, "no negative fixtures found"));
    }
    for fixture in &set.negative {
        let result = match fixture.parse()? {
            Err(ParseError::Syntax(err)) => TestResult::pass(
                VALIDATOR,
                format!("{} rejected at {}: {}", fixture.name(), err.position, err.message),
            ),
            Err(other) => TestResult::fail(
                VALIDATOR,
                format!("{} rejected with the wrong error: {other}", fixture.name()),
            ),
            Ok(graph) => TestResult::fail_with_details(
                VALIDATOR,
                format!("{} ({}) was accepted", fixture.name(), fixture.grammar),
                graph.iter().take(5).map(ToString::to_string).collect(),
            ),
        };
        report.push(result);
    }
    Ok(report)
}
