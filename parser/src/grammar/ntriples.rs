//! RDF 1.1 N-Triples.
//!
//! The input is consumed one line at a time, so a document of any size is
//! parsed in constant memory. Only absolute IRIs are accepted; the base IRI
//! plays no part.

use std::io::{self, BufRead};

use winnow::stream::Location;
use winnow::token::take_while;
use winnow::{ModalResult, Parser};

use super::lex::{self, Input};
use super::{BlankNodeAllocator, GrammarParser, TripleStream};
use crate::error::{ParseError, Position, SyntaxError};
use crate::format::GrammarId;
use crate::iri;
use crate::model::{Iri, Language, Literal, Subject, Term, Triple};

/// Parser for `application/n-triples`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NTriplesParser;

impl GrammarParser for NTriplesParser {
    fn grammar(&self) -> GrammarId {
        GrammarId::NTriples
    }

    fn parse<'a>(&self, input: Box<dyn BufRead + 'a>, _base: &Iri) -> TripleStream<'a> {
        Box::new(Lines {
            input,
            bnodes: BlankNodeAllocator::new(),
            buf: Vec::new(),
            line: 0,
            offset: 0,
            done: false,
        })
    }
}

struct Lines<'a> {
    input: Box<dyn BufRead + 'a>,
    bnodes: BlankNodeAllocator,
    buf: Vec<u8>,
    line: usize,
    /// Byte offset of the start of the next line.
    offset: usize,
    done: bool,
}

impl Iterator for Lines<'_> {
    type Item = Result<Triple, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            let read = match read_line(&mut *self.input, &mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(read) => read,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
            };
            self.line += 1;
            let line_start = self.offset;
            self.offset += read;

            let text = match std::str::from_utf8(&self.buf) {
                Ok(text) => text,
                Err(err) => {
                    self.done = true;
                    let valid = err.valid_up_to();
                    let prefix = String::from_utf8_lossy(&self.buf[..valid]);
                    let fault = Fault::new(valid, "input is not valid UTF-8");
                    return Some(Err(fault.locate(&prefix, self.line, line_start)));
                }
            };

            let mut input = Input::new(text);
            match statement(&mut input, &self.bnodes) {
                Ok(Some(triple)) => return Some(Ok(triple)),
                Ok(None) => {}
                Err(fault) => {
                    self.done = true;
                    return Some(Err(fault.locate(text, self.line, line_start)));
                }
            }
        }
        None
    }
}

/// Reads one line ending in `\n`, `\r` or `\r\n` into `buf`, terminator
/// included. Returns the number of bytes read, zero at end of input.
fn read_line(input: &mut dyn BufRead, buf: &mut Vec<u8>) -> io::Result<usize> {
    let start = buf.len();
    loop {
        let available = match input.fill_buf() {
            Ok(available) => available,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        if available.is_empty() {
            break;
        }
        if buf.len() > start && buf.last() == Some(&b'\r') {
            if available.first() == Some(&b'\n') {
                buf.push(b'\n');
                input.consume(1);
            }
            break;
        }
        match available.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(end) => {
                buf.extend_from_slice(&available[..=end]);
                input.consume(end + 1);
                if buf.last() == Some(&b'\n') {
                    break;
                }
            }
            None => {
                let len = available.len();
                buf.extend_from_slice(available);
                input.consume(len);
            }
        }
    }
    Ok(buf.len() - start)
}

/// A failure inside one line, located by byte offset within it.
#[derive(Debug)]
struct Fault {
    offset: usize,
    message: String,
}

impl Fault {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }

    fn here(input: &Input<'_>, message: impl Into<String>) -> Self {
        Self::new(input.current_token_start(), message)
    }

    fn locate(self, line_text: &str, line: usize, line_start: usize) -> ParseError {
        let end = self.offset.min(line_text.len());
        let column = line_text.get(..end).map_or(1, |s| s.chars().count() + 1);
        let position = Position::Text {
            line,
            column,
            offset: line_start + self.offset,
        };
        SyntaxError::new(position, self.message).into()
    }
}

fn skip_ws(input: &mut Input<'_>) {
    let _: ModalResult<&str> = take_while(0.., lex::is_ws).parse_next(input);
}

/// One line: a triple, or nothing for blank and comment lines.
fn statement(input: &mut Input<'_>, bnodes: &BlankNodeAllocator) -> Result<Option<Triple>, Fault> {
    skip_ws(input);
    if input.is_empty() || input.starts_with('#') {
        return Ok(None);
    }

    let subject = subject(input, bnodes)?;
    skip_ws(input);
    let predicate = absolute_iri(input)?;
    skip_ws(input);
    let object = object(input, bnodes)?;
    let object_end = input.current_token_start();
    skip_ws(input);

    if !input.starts_with('.') {
        return Err(Fault::new(object_end, "expected '.' at end of statement"));
    }
    let _: ModalResult<char> = '.'.parse_next(input);
    skip_ws(input);
    if !(input.is_empty() || input.starts_with('#')) {
        return Err(Fault::here(input, "unexpected content after '.'"));
    }

    Ok(Some(Triple::new(subject, predicate, object)))
}

fn subject(input: &mut Input<'_>, bnodes: &BlankNodeAllocator) -> Result<Subject, Fault> {
    if input.starts_with('<') {
        absolute_iri(input).map(Subject::from)
    } else if input.starts_with("_:") {
        blank_node(input, bnodes).map(Subject::from)
    } else {
        Err(Fault::here(input, "expected IRI or blank node as subject"))
    }
}

fn object(input: &mut Input<'_>, bnodes: &BlankNodeAllocator) -> Result<Term, Fault> {
    if input.starts_with('<') {
        absolute_iri(input).map(Term::from)
    } else if input.starts_with("_:") {
        blank_node(input, bnodes).map(Term::from)
    } else if input.starts_with('"') {
        literal(input).map(Term::from)
    } else {
        Err(Fault::here(input, "expected IRI, blank node or literal as object"))
    }
}

fn absolute_iri(input: &mut Input<'_>) -> Result<Iri, Fault> {
    let start = input.current_token_start();
    let iri = lex::iri_ref(input).map_err(|_| Fault::new(start, "malformed IRI"))?;
    if !iri::is_absolute(&iri) {
        return Err(Fault::new(start, format!("relative IRI <{iri}> is not allowed")));
    }
    Ok(Iri::new(iri))
}

fn blank_node(
    input: &mut Input<'_>,
    bnodes: &BlankNodeAllocator,
) -> Result<crate::model::BlankNode, Fault> {
    let start = input.current_token_start();
    let label =
        lex::blank_node_label(input).map_err(|_| Fault::new(start, "malformed blank node label"))?;
    Ok(bnodes.labeled(&label))
}

fn literal(input: &mut Input<'_>) -> Result<Literal, Fault> {
    let start = input.current_token_start();
    let lexical = lex::short_string('"')(input)
        .map_err(|_| Fault::new(start, "unterminated or malformed string literal"))?;

    if input.starts_with("^^") {
        let _: ModalResult<&str> = "^^".parse_next(input);
        let datatype = absolute_iri(input)?;
        Ok(Literal::typed(lexical, datatype))
    } else if input.starts_with('@') {
        let start = input.current_token_start();
        let tag = lex::lang_tag(input).map_err(|_| Fault::new(start, "malformed language tag"))?;
        Ok(Literal::language_tagged(lexical, Language::new(tag)))
    } else {
        Ok(Literal::simple(lexical))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::vocab::{rdf, xsd};

    fn parse(text: &str) -> Vec<Result<Triple, ParseError>> {
        NTriplesParser
            .parse(Box::new(text.as_bytes()), &Iri::new(iri::FAKE_BASE))
            .collect()
    }

    fn triples(text: &str) -> Vec<Triple> {
        parse(text).into_iter().map(Result::unwrap).collect()
    }

    fn syntax_error(text: &str) -> SyntaxError {
        match parse(text).pop() {
            Some(Err(ParseError::Syntax(err))) => err,
            other => unreachable!("expected a syntax error, got {other:?}"),
        }
    }

    #[test]
    fn plain_statements() {
        let parsed = triples(
            "# a comment\n\
             <http://example.org/s> <http://example.org/p> <http://example.org/o> .\n\
             \n\
             <http://example.org/s> <http://example.org/p> \"v\" . # trailing\n",
        );
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].object, Term::Iri(Iri::new("http://example.org/o")));
        let literal = parsed[1].object.as_literal().unwrap();
        assert_eq!(literal.lexical_form(), "v");
        assert_eq!(literal.datatype().as_str(), xsd::STRING);
    }

    #[test]
    fn typed_and_tagged_literals() {
        let parsed = triples(
            "<http://e/s> <http://e/p> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n\
             <http://e/s> <http://e/p> \"ciao\"@IT .\n",
        );
        let typed = parsed[0].object.as_literal().unwrap();
        assert_eq!(typed.datatype().as_str(), xsd::INTEGER);
        let tagged = parsed[1].object.as_literal().unwrap();
        assert_eq!(tagged.datatype().as_str(), rdf::LANG_STRING);
        assert_eq!(tagged.language().unwrap().as_str(), "it");
    }

    #[test]
    fn escapes_are_decoded() {
        let parsed = triples(r#"<http://e/s> <http://e/p> "a\tbé\U0001F600\"" ."#);
        assert_eq!(
            parsed[0].object.as_literal().unwrap().lexical_form(),
            "a\tb\u{e9}\u{1F600}\""
        );
        let parsed = triples(r"<http://e/é> <http://e/p> <http://e/o> .");
        assert_eq!(parsed[0].subject, Subject::Iri(Iri::new("http://e/\u{e9}")));
    }

    #[test]
    fn blank_nodes_share_labels_within_a_document() {
        let parsed = triples("_:a <http://e/p> _:b.\n_:b <http://e/p> _:a .\n");
        assert_eq!(
            parsed[0].subject.as_blank_node(),
            parsed[1].object.as_blank_node()
        );
        assert_eq!(parsed[0].object.as_blank_node(), parsed[1].subject.as_blank_node());
        assert_ne!(parsed[0].subject.as_blank_node(), parsed[0].object.as_blank_node());
    }

    #[test]
    fn relative_iris_are_rejected() {
        let err = syntax_error("<s> <http://e/p> <http://e/o> .");
        assert!(err.message.contains("relative IRI"));
    }

    #[test]
    fn missing_dot_reports_the_column() {
        let err = syntax_error(
            "<http://e/s> <http://e/p> <http://e/o> .\n<http://e/s> <http://e/p> <http://e/o>\n",
        );
        assert_eq!(
            err.position,
            Position::Text {
                line: 2,
                column: 39,
                offset: 41 + 38,
            }
        );
    }

    #[test]
    fn every_line_ending_is_accepted() {
        let statement = "<http://e/s> <http://e/p> <http://e/o> .";
        for eol in ["\n", "\r", "\r\n", "\r\r\n\n"] {
            let document = format!("{statement}{eol}{statement}{eol}{statement}");
            assert_eq!(triples(&document).len(), 3, "{eol:?}");
        }
    }

    #[test]
    fn lines_are_counted_per_terminator() {
        let err = syntax_error("<http://e/s> <http://e/p> <http://e/o> .\r\n# c\r<http://e/s> oops\r\n");
        assert!(matches!(err.position, Position::Text { line: 3, .. }));

        let mut lines = Vec::new();
        let mut input: &[u8] = b"a\rb\r\nc\n\rd";
        let mut buf = Vec::new();
        while read_line(&mut input, &mut buf).unwrap() > 0 {
            lines.push(String::from_utf8(std::mem::take(&mut buf)).unwrap());
        }
        assert_eq!(lines, ["a\r", "b\r\n", "c\n", "\r", "d"]);
    }

    #[test]
    fn triples_before_an_error_are_yielded() {
        let results = parse(
            "<http://e/s> <http://e/p> \"ok\" .\n\
             <http://e/s> <http://e/p> \"open .\n\
             <http://e/s> <http://e/p> \"never\" .\n",
        );
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ParseError::Syntax(_))));
    }

    #[test]
    fn datatype_and_language_are_exclusive() {
        syntax_error("<http://e/s> <http://e/p> \"x\"@en^^<http://e/dt> .");
    }

    #[test]
    fn literal_subjects_are_rejected() {
        let err = syntax_error("\"x\" <http://e/p> <http://e/o> .");
        assert!(err.message.contains("subject"));
    }
}
