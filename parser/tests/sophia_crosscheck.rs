//! Cross-checks the Turtle and N-Triples readers against sophia.
//!
//! Blank node labels differ between the two implementations, so the
//! comparison is on what survives relabelling: triple count, the multiset of
//! predicates and the multiset of literal lexical forms.

use std::fs;
use std::path::PathBuf;

use sophia_api::source::TripleSource;
use sophia_api::term::Term as _;
use sophia_api::triple::Triple as _;

use serializedform::{parsing_provider, SimpleGraph};

#[derive(Debug, PartialEq, Eq)]
struct Summary {
    triples: usize,
    predicates: Vec<String>,
    literals: Vec<String>,
}

fn read(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name);
    fs::read_to_string(path).unwrap()
}

fn ours(text: &str, content_type: &str) -> Summary {
    let mut graph = SimpleGraph::new();
    parsing_provider()
        .parse(&mut graph, text.as_bytes(), content_type, None)
        .unwrap();
    let mut predicates: Vec<String> = graph.iter().map(|t| t.predicate.as_str().to_owned()).collect();
    let mut literals: Vec<String> = graph
        .iter()
        .filter_map(|t| t.object.as_literal())
        .map(|l| l.lexical_form().to_owned())
        .collect();
    predicates.sort();
    literals.sort();
    Summary {
        triples: graph.len(),
        predicates,
        literals,
    }
}

fn theirs(mut source: impl TripleSource) -> Summary {
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
        .unwrap();
    predicates.sort();
    literals.sort();
    Summary {
        triples,
        predicates,
        literals,
    }
}

#[test]
fn turtle_agrees_with_sophia() {
    let text = read("test-04.ttl");
    let expected = theirs(sophia_turtle::parser::turtle::parse_str(&text));
    assert_eq!(ours(&text, "text/turtle"), expected);
}

#[test]
fn ntriples_agrees_with_sophia() {
    for name in ["test-04.nt", "test-05.nt", "test-06.nt"] {
        let text = read(name);
        let expected = theirs(sophia_turtle::parser::nt::parse_str(&text));
        assert_eq!(ours(&text, "application/n-triples"), expected, "{name}");
    }
}
