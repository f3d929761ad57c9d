//! Rejected input: unknown formats, bad bases and malformed documents.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::PathBuf;

use serializedform::{
    parsing_provider, GrammarId, Iri, ParseError, Position, SimpleGraph, SyntaxError,
};

fn bad_fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/bad")
}

fn parse_str(text: &str, content_type: &str) -> (SimpleGraph, Result<(), ParseError>) {
    let mut graph = SimpleGraph::new();
    let result = parsing_provider().parse(&mut graph, text.as_bytes(), content_type, None);
    (graph, result)
}

fn syntax(result: Result<(), ParseError>) -> SyntaxError {
    match result {
        Err(ParseError::Syntax(err)) => err,
        other => unreachable!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn unsupported_content_type_inserts_nothing() {
    let (graph, result) = parse_str("<http://e/s> <http://e/p> <http://e/o> .", "text/csv;header=present");
    match result {
        Err(ParseError::UnsupportedFormat(err)) => {
            assert_eq!(err.content_type, "text/csv;header=present");
        }
        other => unreachable!("expected UnsupportedFormat, got {other:?}"),
    }
    assert!(graph.is_empty());
}

#[test]
fn matching_is_case_sensitive() {
    let (_, result) = parse_str("", "Text/Turtle");
    assert!(matches!(result, Err(ParseError::UnsupportedFormat(_))));
}

#[test]
fn relative_base_is_rejected() {
    let mut graph = SimpleGraph::new();
    let result = parsing_provider().parse(
        &mut graph,
        "".as_bytes(),
        "text/turtle",
        Some(&Iri::new("/not/absolute")),
    );
    assert!(matches!(result, Err(ParseError::InvalidBase(ref base)) if base == "/not/absolute"));
}

#[test]
fn triples_before_a_turtle_error_are_kept() {
    let (graph, result) = parse_str(
        "@prefix ex: <http://example.org/> .\nex:a ex:p 1 .\nex:b ex:p 2 .\nex:c ex:p nope:x .\n",
        "text/turtle",
    );
    let err = syntax(result);
    assert!(err.message.contains("nope"), "{err}");
    assert!(matches!(err.position, Position::Text { line: 4, .. }));
    assert_eq!(graph.len(), 2);
}

#[test]
fn triples_before_an_ntriples_error_are_kept() {
    let file = File::open(bad_fixtures().join("missing-dot.nt")).unwrap();
    let mut graph = SimpleGraph::new();
    let result = parsing_provider().parse(&mut graph, file, "application/n-triples", None);
    let err = syntax(result);
    assert!(matches!(err.position, Position::Text { line: 2, .. }));
    assert_eq!(graph.len(), 1);
}

#[test]
fn invalid_utf8_is_a_syntax_error() {
    let mut graph = SimpleGraph::new();
    let bytes: &[u8] = b"<http://e/s> <http://e/p> \"caf\xe9\" .\n";
    let result = parsing_provider().parse(&mut graph, bytes, "application/n-triples", None);
    let err = syntax(result);
    assert!(err.message.contains("UTF-8"));
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stream closed"))
    }
}

#[test]
fn read_failures_surface_as_io_errors() {
    let mut graph = SimpleGraph::new();
    let result = parsing_provider().parse(&mut graph, FailingReader, "text/turtle", None);
    assert!(matches!(result, Err(ParseError::Io(_))));
}

#[test]
fn every_bad_fixture_is_rejected() {
    let mut checked = 0;
    for entry in fs::read_dir(bad_fixtures()).unwrap() {
        let path = entry.unwrap().path();
        let extension = path.extension().and_then(|e| e.to_str()).unwrap();
        let grammar = GrammarId::from_extension(extension).unwrap();

        let mut graph = SimpleGraph::new();
        let result = parsing_provider().parse(
            &mut graph,
            File::open(&path).unwrap(),
            grammar.media_type(),
            None,
        );
        assert!(
            matches!(result, Err(ParseError::Syntax(_))),
            "{} was accepted: {result:?}",
            path.display()
        );
        checked += 1;
    }
    assert!(checked >= 8);
}

#[test]
fn jsonld_structural_errors_carry_a_pointer() {
    let (_, result) = parse_str(
        r#"{"@context": {"@vocab": "http://e/"}, "p": {"@value": "x", "@type": "@id", "@language": "en"}}"#,
        "application/ld+json",
    );
    let err = syntax(result);
    assert!(matches!(err.position, Position::Path(ref pointer) if pointer.starts_with("/p")));
}
