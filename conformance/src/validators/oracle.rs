//! Independent cross-check of Turtle and N-Triples fixtures against sophia.
//!
//! Blank-node labels are implementation-specific, so the check compares what
//! survives relabelling: the triple count and the sorted predicates and
//! literal lexical forms.

use anyhow::{Context, Result};
use sophia_api::source::TripleSource;
use sophia_api::term::Term as _;
use sophia_api::triple::Triple as _;

use serializedform::GrammarId;

use crate::fixture::{Fixture, FixtureSet};
use crate::report::{ConformanceReport, TestResult};

const VALIDATOR: &str = "oracle/sophia";

#[derive(Debug, PartialEq, Eq)]
struct Fingerprint {
    triples: usize,
    predicates: Vec<String>,
    literals: Vec<String>,
}

impl Fingerprint {
    fn new(triples: usize, mut predicates: Vec<String>, mut literals: Vec<String>) -> Self {
        predicates.sort();
        literals.sort();
        Self {
            triples,
            predicates,
            literals,
        }
    }
}

/// Compares every well-formed `.ttl` and `.nt` fixture with sophia's reading
/// of the same text.
///
/// # Errors
///
/// Returns an error if a fixture file cannot be read.
pub fn validate(set: &FixtureSet) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    let candidates = set
        .groups
        .values()
        .flatten()
        .filter(|f| matches!(f.grammar, GrammarId::Turtle | GrammarId::NTriples));

    for fixture in candidates {
        let text = std::fs::read_to_string(&fixture.path)
            .with_context(|| format!("Failed to read {}", fixture.path.display()))?;
        let Some(theirs) = theirs(fixture, &text) else {
            report.push(TestResult::warn(
                VALIDATOR,
                format!("sophia rejected {}, skipping", fixture.name()),
            ));
            continue;
        };
        // Rejections by our parser are reported by the equivalence check.
        let Ok(graph) = fixture.parse()? else {
            continue;
        };
        let ours = Fingerprint::new(
            graph.len(),
            graph.iter().map(|t| t.predicate.as_str().to_owned()).collect(),
            graph
                .iter()
                .filter_map(|t| t.object.as_literal())
                .map(|l| l.lexical_form().to_owned())
                .collect(),
        );
        if ours == theirs {
            report.push(TestResult::pass(
                VALIDATOR,
                format!("{} agrees with sophia ({} triples)", fixture.name(), ours.triples),
            ));
        } else {
            report.push(TestResult::fail_with_details(
                VALIDATOR,
                format!("{} disagrees with sophia", fixture.name()),
                vec![format!("ours: {ours:?}"), format!("sophia: {theirs:?}")],
            ));
        }
    }
    Ok(report)
}

fn theirs(fixture: &Fixture, text: &str) -> Option<Fingerprint> {
    match fixture.grammar {
        GrammarId::Turtle => fingerprint(sophia_turtle::parser::turtle::parse_str(text)),
        _ => fingerprint(sophia_turtle::parser::nt::parse_str(text)),
    }
}

fn fingerprint(mut source: impl TripleSource) -> Option<Fingerprint> {
    let mut triples = 0;
    let mut predicates = Vec::new();
    let mut literals = Vec::new();
    source
        .for_each_triple(|t| {
            triples += 1;
            if let Some(iri) = t.p().iri() {
                predicates.push(iri.as_str().to_owned());
            }
            if let Some(lexical) = t.o().lexical_form() {
                literals.push(lexical.to_string());
            }
        })
        .ok()?;
    Some(Fingerprint::new(triples, predicates, literals))
}
