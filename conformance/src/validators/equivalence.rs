//! Cross-format equivalence.
//!
//! Every document in a fixture group must parse to a graph isomorphic to the
//! group's N-Triples reference. Groups without a reference only have to
//! parse.

use std::collections::HashSet;

use anyhow::Result;
use serializedform::{GrammarId, ImmutableGraph, Triple};

use crate::fixture::{Fixture, FixtureSet};
use crate::report::{ConformanceReport, TestResult};

const VALIDATOR: &str = "fixtures/equivalence";

/// Maximum number of differing triples listed per mismatch.
const MAX_DETAILS: usize = 10;

/// Checks every positive fixture group.
///
/// # Errors
///
/// Returns an error if a fixture file cannot be opened.
pub fn validate(set: &FixtureSet) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    if set.groups.is_empty() {
        report.push(TestResult::fail(VALIDATOR, "no well-formed fixtures found"));
    }
    for (stem, members) in &set.groups {
        match members.iter().find(|f| f.grammar == GrammarId::NTriples) {
            Some(reference) => validate_group(reference, members, &mut report)?,
            None => {
                report.push(TestResult::warn(
                    VALIDATOR,
                    format!("{stem}: no N-Triples reference, checking that each member parses"),
                ));
                for fixture in members {
                    if parses(fixture, &mut report)?.is_some() {
                        report.push(TestResult::pass(VALIDATOR, format!("{} parses", fixture.name())));
                    }
                }
            }
        }
    }
    for skipped in &set.skipped {
        report.push(TestResult::warn(VALIDATOR, skipped.to_string()));
    }
    Ok(report)
}

fn validate_group(
    reference: &Fixture,
    members: &[Fixture],
    report: &mut ConformanceReport,
) -> Result<()> {
    let Some(expected) = parses(reference, report)? else {
        return Ok(());
    };
    for fixture in members.iter().filter(|f| f.path != reference.path) {
        if let Some(actual) = parses(fixture, report)? {
            report.push(compare(
                VALIDATOR,
                &format!("{} ≡ {}", fixture.name(), reference.name()),
                &expected,
                &actual,
            ));
        }
    }
    Ok(())
}

/// Parses `fixture`, recording a failure if the parser rejects it.
fn parses(fixture: &Fixture, report: &mut ConformanceReport) -> Result<Option<ImmutableGraph>> {
    Ok(match fixture.parse()? {
        Ok(graph) => Some(graph),
        Err(err) => {
            report.push(TestResult::fail(
                VALIDATOR,
                format!("{} ({}) was rejected: {err}", fixture.name(), fixture.grammar),
            ));
            None
        }
    })
}

/// Compares two graphs up to blank-node renaming.
///
/// On mismatch the details list the triple counts and the ground triples
/// (those without blank nodes) found on only one side.
#[must_use]
pub fn compare(
    validator: &str,
    label: &str,
    expected: &ImmutableGraph,
    actual: &ImmutableGraph,
) -> TestResult {
    if actual == expected {
        return TestResult::pass(validator, format!("{label} ({} triples)", actual.len()));
    }

    let mut details = vec![format!(
        "expected {} triples, found {}",
        expected.len(),
        actual.len()
    )];
    let expected_ground = ground(expected);
    let actual_ground = ground(actual);
    details.extend(
        actual_ground
            .difference(&expected_ground)
            .map(|t| format!("unexpected {t}"))
            .take(MAX_DETAILS),
    );
    details.extend(
        expected_ground
            .difference(&actual_ground)
            .map(|t| format!("missing {t}"))
            .take(MAX_DETAILS),
    );
    TestResult::fail_with_details(validator, format!("{label}: graphs differ"), details)
}

fn ground(graph: &ImmutableGraph) -> HashSet<&Triple> {
    graph
        .iter()
        .filter(|t| t.subject.as_blank_node().is_none() && t.object.as_blank_node().is_none())
        .collect()
}
