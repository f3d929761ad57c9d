//! Turtle and Notation 3.
//!
//! Both grammars share one tokenizer and one recursive-descent parser; the
//! [`Dialect`] switches on the N3 operators and keywords. The document is
//! read up front and parsed one statement at a time, so triples from the
//! statements before a syntax error are still delivered.

use std::io::BufRead;

use super::{failed_stream, read_document, GrammarParser, StatementStream, TripleStream};
use crate::format::GrammarId;
use crate::model::Iri;

mod lexer;
mod parser;
mod token;

/// Which grammar the shared parser accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dialect {
    Turtle,
    N3,
}

/// Parser for `text/turtle` and `application/x-turtle`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TurtleParser;

/// Parser for `text/rdf+n3`.
///
/// Accepts Turtle plus `=`, `=>`, `<=`, `has` and `is .. of`. Formulae,
/// variables and quantifiers are rejected since they have no meaning as
/// plain triples.
#[derive(Debug, Default, Clone, Copy)]
pub struct N3Parser;

fn parse_dialect<'a>(input: Box<dyn BufRead + 'a>, base: &Iri, dialect: Dialect) -> TripleStream<'a> {
    match read_document(input) {
        Ok(text) => Box::new(StatementStream::new(parser::Parser::new(text, base, dialect))),
        Err(err) => failed_stream(err),
    }
}

impl GrammarParser for TurtleParser {
    fn grammar(&self) -> GrammarId {
        GrammarId::Turtle
    }

    fn parse<'a>(&self, input: Box<dyn BufRead + 'a>, base: &Iri) -> TripleStream<'a> {
        parse_dialect(input, base, Dialect::Turtle)
    }
}

impl GrammarParser for N3Parser {
    fn grammar(&self) -> GrammarId {
        GrammarId::N3
    }

    fn parse<'a>(&self, input: Box<dyn BufRead + 'a>, base: &Iri) -> TripleStream<'a> {
        parse_dialect(input, base, Dialect::N3)
    }
}
