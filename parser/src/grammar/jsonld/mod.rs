//! JSON-LD 1.1, read with `serde_json` and converted to triples.
//!
//! Documents are expanded against local contexts only. Everything lands in
//! the default graph; a named graph is reported as a syntax error rather
//! than flattened.

use std::io::BufRead;

use serde_json::Value;

use super::{failed_stream, read_document, GrammarParser, TripleStream};
use crate::error::{ParseError, Position, SyntaxError};
use crate::format::GrammarId;
use crate::model::Iri;

mod context;
mod to_rdf;

use context::Context;
use to_rdf::Converter;

/// Parser for `application/ld+json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonLdParser;

impl GrammarParser for JsonLdParser {
    fn grammar(&self) -> GrammarId {
        GrammarId::JsonLd
    }

    fn parse<'a>(&self, input: Box<dyn BufRead + 'a>, base: &Iri) -> TripleStream<'a> {
        let text = match read_document(input) {
            Ok(text) => text,
            Err(err) => return failed_stream(err),
        };
        let document: Value = match serde_json::from_str(&text) {
            Ok(document) => document,
            Err(err) => return failed_stream(malformed(&text, &err)),
        };

        let mut converter = Converter::new();
        let outcome = converter.document(&document, &Context::new(base.as_str()));
        Box::new(
            converter
                .into_triples()
                .into_iter()
                .map(Ok)
                .chain(outcome.err().map(Err)),
        )
    }
}

/// Locates a `serde_json` error in the source text.
///
/// `serde_json` reports the position just past the character it failed on,
/// which for a bad literal such as `tru` is after the following whitespace.
/// The reported position is moved back to the start of the offending token.
fn malformed(text: &str, err: &serde_json::Error) -> ParseError {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(err.line().saturating_sub(1))
        .map(str::len)
        .sum();
    let mut reported = (line_start + err.column()).min(text.len());
    while !text.is_char_boundary(reported) {
        reported -= 1;
    }

    let before = text[..reported].trim_end();
    let token_start = before
        .trim_end_matches(|c: char| c.is_alphanumeric() || matches!(c, '.' | '-' | '+'))
        .len();
    let offset = if token_start < before.len() {
        token_start
    } else {
        before.char_indices().next_back().map_or(0, |(i, _)| i)
    };
    let position = Position::at_offset(text, offset);
    SyntaxError::new(position, format!("malformed JSON: {err}")).into()
}
