//! Runs the embedded cases in [`crate::cases`].

use serializedform::{parsing_provider, ImmutableGraph, ParseError, SimpleGraph};

use crate::cases::{self, Case};
use crate::report::{ConformanceReport, TestResult};
use crate::validators::equivalence::compare;

const VALIDATOR: &str = "cases/equivalence";

/// Checks that every document of every embedded case matches its reference.
#[must_use]
pub fn validate() -> ConformanceReport {
    let mut report = ConformanceReport::new();
    for case in cases::ALL {
        validate_case(case, &mut report);
    }
    report
}

fn validate_case(case: &Case, report: &mut ConformanceReport) {
    let Some((&(reference_type, reference), others)) = case.documents.split_first() else {
        report.push(TestResult::warn(VALIDATOR, format!("{}: no documents", case.name)));
        return;
    };
    let expected = match parse(reference, reference_type) {
        Ok(graph) => graph,
        Err(err) => {
            report.push(TestResult::fail(
                VALIDATOR,
                format!("{} [{reference_type}] was rejected: {err}", case.name),
            ));
            return;
        }
    };
    for &(content_type, document) in others {
        let label = format!("{} [{content_type}]", case.name);
        match parse(document, content_type) {
            Ok(actual) => report.push(compare(VALIDATOR, &label, &expected, &actual)),
            Err(err) => report.push(TestResult::fail(VALIDATOR, format!("{label} was rejected: {err}"))),
        }
    }
}

fn parse(document: &str, content_type: &str) -> Result<ImmutableGraph, ParseError> {
    let mut graph = SimpleGraph::new();
    parsing_provider().parse(&mut graph, document.as_bytes(), content_type, None)?;
    Ok(graph.immutable_graph())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_cases_pass() {
        let report = validate();
        let failures: Vec<_> = report.results.iter().filter(|r| r.is_failure()).collect();
        assert!(failures.is_empty(), "case failures: {failures:#?}");
        assert_eq!(report.results.len(), 12);
    }
}
