//! Grammar parsers, one per supported serialization.
//!
//! Every parser implements [`GrammarParser`]: it takes a byte stream and a
//! base IRI and returns a lazy [`TripleStream`] of triples in document
//! order. The first grammar violation is yielded as an `Err` and ends the
//! stream.

use std::collections::VecDeque;
use std::io::BufRead;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{ParseError, Position, SyntaxError};
use crate::format::GrammarId;
use crate::model::{BlankNode, Iri, Triple};

pub mod jsonld;
mod lex;
pub mod ntriples;
pub mod rdfxml;
pub mod turtle;

/// A lazy sequence of parsed triples.
pub type TripleStream<'a> = Box<dyn Iterator<Item = Result<Triple, ParseError>> + 'a>;

/// A parser for one serialization syntax.
pub trait GrammarParser: Send + Sync {
    /// The grammar this parser implements.
    fn grammar(&self) -> GrammarId;

    /// Parses `input`, resolving relative references against `base`.
    ///
    /// `base` is always absolute. Read failures and grammar violations are
    /// reported through the stream.
    fn parse<'a>(&self, input: Box<dyn BufRead + 'a>, base: &Iri) -> TripleStream<'a>;
}

/// Reads the whole input as UTF-8.
///
/// Grammars that need the full document (everything except N-Triples) start
/// with this.
pub(crate) fn read_document(mut input: Box<dyn BufRead + '_>) -> Result<String, ParseError> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    String::from_utf8(bytes).map_err(|e| {
        let offset = e.utf8_error().valid_up_to();
        let prefix = String::from_utf8_lossy(&e.as_bytes()[..offset]).into_owned();
        ParseError::Syntax(SyntaxError::new(
            Position::at_offset(&prefix, offset),
            "input is not valid UTF-8",
        ))
    })
}

static NEXT_SCOPE: AtomicU64 = AtomicU64::new(0);

/// Hands out blank nodes for one document.
///
/// Each allocator draws a fresh scope, so the same label in two documents
/// parsed into one graph names two different nodes. Labelled and anonymous
/// nodes live in disjoint namespaces inside the scope.
#[derive(Debug)]
pub(crate) struct BlankNodeAllocator {
    scope: u64,
    next: u64,
}

impl BlankNodeAllocator {
    pub(crate) fn new() -> Self {
        Self {
            scope: NEXT_SCOPE.fetch_add(1, Ordering::Relaxed),
            next: 0,
        }
    }

    /// The node for a document label such as `_:alice`.
    pub(crate) fn labeled(&self, label: &str) -> BlankNode {
        BlankNode::new(format!("s{}l{}", self.scope, label))
    }

    /// A node no other part of the document can refer to.
    pub(crate) fn fresh(&mut self) -> BlankNode {
        self.next += 1;
        BlankNode::new(format!("s{}a{}", self.scope, self.next))
    }
}

/// Drives a statement-at-a-time parser as a [`TripleStream`].
///
/// `step` parses the next statement, pushing its triples into the queue, and
/// returns `Ok(false)` once the document is exhausted. Triples queued before
/// an error are still yielded, then the error, then nothing.
pub(crate) struct StatementStream<P> {
    parser: P,
    queue: VecDeque<Triple>,
    failed: Option<ParseError>,
    done: bool,
}

/// A parser that can be stepped one statement at a time.
pub(crate) trait StatementParser {
    fn step(&mut self, queue: &mut VecDeque<Triple>) -> Result<bool, ParseError>;
}

impl<P: StatementParser> StatementStream<P> {
    pub(crate) fn new(parser: P) -> Self {
        Self {
            parser,
            queue: VecDeque::new(),
            failed: None,
            done: false,
        }
    }
}

impl<P: StatementParser> Iterator for StatementStream<P> {
    type Item = Result<Triple, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(triple) = self.queue.pop_front() {
                return Some(Ok(triple));
            }
            if let Some(err) = self.failed.take() {
                return Some(Err(err));
            }
            if self.done {
                return None;
            }
            match self.parser.step(&mut self.queue) {
                Ok(true) => {}
                Ok(false) => self.done = true,
                Err(err) => {
                    self.failed = Some(err);
                    self.done = true;
                }
            }
        }
    }
}

/// A stream that yields a single error.
pub(crate) fn failed_stream<'a>(err: ParseError) -> TripleStream<'a> {
    Box::new(std::iter::once(Err(err)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn allocators_never_share_labels() {
        let a = BlankNodeAllocator::new();
        let b = BlankNodeAllocator::new();
        assert_ne!(a.labeled("x"), b.labeled("x"));
        assert_eq!(a.labeled("x"), a.labeled("x"));

        let mut c = BlankNodeAllocator::new();
        let first = c.fresh();
        assert_ne!(first, c.fresh());
        assert_ne!(first, c.labeled("1"));
    }

    #[test]
    fn invalid_utf8_is_a_syntax_error() {
        let bytes: &[u8] = b"ok\n\xff";
        let err = read_document(Box::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Syntax(SyntaxError {
                position: Position::Text {
                    line: 2,
                    offset: 3,
                    ..
                },
                ..
            })
        ));
    }
}
