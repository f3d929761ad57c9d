//! Content-type resolution checks against the live registry.

use serializedform::{parsing_provider, resolve, supported_formats};

use crate::report::{ConformanceReport, TestResult};

const VALIDATOR: &str = "resolver";

/// Parameter suffixes that must not change which grammar is selected.
const PARAMETERS: &[&str] = &[";charset=UTF-8", ";charset=UTF-", "; q=0.9", ";"];

/// Content types that must stay unsupported.
const UNSUPPORTED: &[&str] = &["text/plain", "application/json", "TEXT/TURTLE", "", ";charset=UTF-8"];

/// Checks that every advertised content type resolves to a registered
/// parser, that parameters are ignored, and that unknown types are refused.
#[must_use]
pub fn validate() -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let provider = parsing_provider();

    for media_type in supported_formats() {
        let Ok(grammar) = resolve(media_type) else {
            report.push(TestResult::fail(VALIDATOR, format!("{media_type} does not resolve")));
            continue;
        };
        match provider.parser_for(grammar) {
            Some(parser) if parser.grammar() == grammar => {}
            _ => {
                report.push(TestResult::fail(
                    VALIDATOR,
                    format!("{media_type} resolves to {grammar}, which has no parser"),
                ));
                continue;
            }
        }

        let drifted: Vec<String> = PARAMETERS
            .iter()
            .map(|parameters| format!("{media_type}{parameters}"))
            .filter(|content_type| resolve(content_type) != Ok(grammar))
            .collect();
        if drifted.is_empty() {
            report.push(TestResult::pass(VALIDATOR, format!("{media_type} → {grammar}")));
        } else {
            report.push(TestResult::fail_with_details(
                VALIDATOR,
                format!("{media_type}: parameters changed the resolution"),
                drifted,
            ));
        }
    }

    for content_type in UNSUPPORTED {
        match resolve(content_type) {
            Err(err) if err.content_type == *content_type => {
                report.push(TestResult::pass(VALIDATOR, format!("{content_type:?} is unsupported")));
            }
            Err(err) => report.push(TestResult::fail(
                VALIDATOR,
                format!("{content_type:?} reported as {:?}", err.content_type),
            )),
            Ok(grammar) => report.push(TestResult::fail(
                VALIDATOR,
                format!("{content_type:?} unexpectedly resolves to {grammar}"),
            )),
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_consistent() {
        let report = validate();
        let failures: Vec<_> = report.results.iter().filter(|r| r.is_failure()).collect();
        assert!(failures.is_empty(), "resolver failures: {failures:#?}");
        assert_eq!(report.results.len(), 6 + UNSUPPORTED.len());
    }
}
