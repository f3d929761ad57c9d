//! Recursive-descent parser for Turtle and the triple-bearing subset of N3.

use std::collections::{HashMap, VecDeque};
use std::mem;

use super::lexer::Lexer;
use super::token::{Token, TokenKind};
use super::Dialect;
use crate::error::{ParseError, SyntaxError};
use crate::grammar::{BlankNodeAllocator, StatementParser};
use crate::iri;
use crate::model::{BlankNode, Iri, Language, Literal, Subject, Term, Triple};
use crate::vocab::{log, owl, rdf, xsd};

type Result<T> = std::result::Result<T, ParseError>;

/// A predicate together with its direction.
#[derive(Debug, Clone)]
enum Verb {
    /// `subject p object`
    Forward(Iri),
    /// `object p subject`, from N3 `is p of` and `<=`.
    Reverse(Iri),
}

/// Parser state for one document.
pub(crate) struct Parser {
    lexer: Lexer,
    lookahead: Option<Token>,
    dialect: Dialect,
    base: String,
    prefixes: HashMap<String, String>,
    bnodes: BlankNodeAllocator,
}

impl StatementParser for Parser {
    fn step(&mut self, queue: &mut VecDeque<Triple>) -> Result<bool> {
        match self.peek()?.kind {
            TokenKind::Eof => return Ok(false),
            TokenKind::KwPrefix | TokenKind::KwSparqlPrefix => self.prefix_directive()?,
            TokenKind::KwBase | TokenKind::KwSparqlBase => self.base_directive()?,
            _ => self.triples(queue)?,
        }
        Ok(true)
    }
}

impl Parser {
    pub(crate) fn new(text: String, base: &Iri, dialect: Dialect) -> Self {
        Self {
            lexer: Lexer::new(text, dialect),
            lookahead: None,
            dialect,
            base: base.as_str().to_owned(),
            prefixes: HashMap::new(),
            bnodes: BlankNodeAllocator::new(),
        }
    }

    // Token plumbing

    fn peek(&mut self) -> Result<&Token> {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        Ok(self.lookahead.insert(token))
    }

    fn advance(&mut self) -> Result<Token> {
        match self.lookahead.take() {
            Some(token) => Ok(token),
            None => Ok(self.lexer.next_token()?),
        }
    }

    fn check(&mut self, kind: &TokenKind) -> Result<bool> {
        Ok(mem::discriminant(&self.peek()?.kind) == mem::discriminant(kind))
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token> {
        let token = self.advance()?;
        if mem::discriminant(&token.kind) == mem::discriminant(kind) {
            Ok(token)
        } else {
            Err(self.error(token.start, format!("expected {kind}, found {}", token.kind)))
        }
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> ParseError {
        SyntaxError::at(self.lexer.text(), offset, message).into()
    }

    // Directives

    fn prefix_directive(&mut self) -> Result<()> {
        let keyword = self.advance()?;
        let Token { kind, start } = self.advance()?;
        let prefix = match kind {
            TokenKind::PrefixedName { prefix, local } if local.is_empty() => prefix,
            other => return Err(self.error(start, format!("expected prefix name, found {other}"))),
        };
        let namespace = self.iri_ref()?;
        self.prefixes.insert(prefix, namespace.into_string());

        if keyword.kind == TokenKind::KwPrefix {
            self.expect(&TokenKind::Dot)?;
        }
        Ok(())
    }

    fn base_directive(&mut self) -> Result<()> {
        let keyword = self.advance()?;
        self.base = self.iri_ref()?.into_string();

        if keyword.kind == TokenKind::KwBase {
            self.expect(&TokenKind::Dot)?;
        }
        Ok(())
    }

    /// An `<...>` token, resolved against the current base.
    fn iri_ref(&mut self) -> Result<Iri> {
        let Token { kind, start } = self.advance()?;
        match kind {
            TokenKind::Iri(reference) => Ok(self.resolve(&reference)),
            other => Err(self.error(start, format!("expected IRI, found {other}"))),
        }
    }

    // Triples

    fn triples(&mut self, queue: &mut VecDeque<Triple>) -> Result<()> {
        let property_list = self.check(&TokenKind::LBracket)?;
        let subject = self.subject(queue)?;

        if !(property_list && self.check(&TokenKind::Dot)?) {
            self.predicate_object_list(&subject, queue)?;
        }
        self.expect(&TokenKind::Dot)?;
        Ok(())
    }

    fn subject(&mut self, queue: &mut VecDeque<Triple>) -> Result<Subject> {
        let start = self.peek()?.start;
        let term = self.term(queue)?;
        self.as_subject(term, start)
    }

    fn as_subject(&self, term: Term, start: usize) -> Result<Subject> {
        match term {
            Term::Iri(iri) => Ok(Subject::Iri(iri)),
            Term::BlankNode(node) => Ok(Subject::BlankNode(node)),
            Term::Literal(_) => Err(self.error(start, "a literal cannot be a subject")),
        }
    }

    fn predicate_object_list(
        &mut self,
        subject: &Subject,
        queue: &mut VecDeque<Triple>,
    ) -> Result<()> {
        loop {
            let verb = self.verb()?;
            self.object_list(subject, &verb, queue)?;

            if !self.check(&TokenKind::Semicolon)? {
                return Ok(());
            }
            while self.check(&TokenKind::Semicolon)? {
                self.advance()?;
            }
            if matches!(
                self.peek()?.kind,
                TokenKind::Dot | TokenKind::RBracket | TokenKind::Eof
            ) {
                return Ok(());
            }
        }
    }

    fn verb(&mut self) -> Result<Verb> {
        let Token { kind, start } = self.advance()?;
        match kind {
            TokenKind::KwA => Ok(Verb::Forward(Iri::new(rdf::TYPE))),
            TokenKind::Iri(reference) => Ok(Verb::Forward(self.resolve(&reference))),
            TokenKind::PrefixedName { prefix, local } => {
                Ok(Verb::Forward(self.expand(&prefix, &local, start)?))
            }
            TokenKind::Equals => Ok(Verb::Forward(Iri::new(owl::SAME_AS))),
            TokenKind::Implies => Ok(Verb::Forward(Iri::new(log::IMPLIES))),
            TokenKind::ImpliedBy => Ok(Verb::Reverse(Iri::new(log::IMPLIES))),
            TokenKind::KwHas => Ok(Verb::Forward(self.predicate_iri()?)),
            TokenKind::KwIs => {
                let predicate = self.predicate_iri()?;
                self.expect(&TokenKind::KwOf)?;
                Ok(Verb::Reverse(predicate))
            }
            TokenKind::Variable(name) => Err(self.unsupported_n3(start, &format!("variable ?{name}"))),
            other => Err(self.error(start, format!("expected predicate, found {other}"))),
        }
    }

    /// An IRI written as `<...>` or a prefixed name.
    fn predicate_iri(&mut self) -> Result<Iri> {
        let Token { kind, start } = self.advance()?;
        match kind {
            TokenKind::Iri(reference) => Ok(self.resolve(&reference)),
            TokenKind::PrefixedName { prefix, local } => self.expand(&prefix, &local, start),
            other => Err(self.error(start, format!("expected IRI, found {other}"))),
        }
    }

    fn object_list(
        &mut self,
        subject: &Subject,
        verb: &Verb,
        queue: &mut VecDeque<Triple>,
    ) -> Result<()> {
        loop {
            let start = self.peek()?.start;
            let object = self.term(queue)?;
            let triple = match verb {
                Verb::Forward(predicate) => Triple::new(subject.clone(), predicate.clone(), object),
                Verb::Reverse(predicate) => Triple::new(
                    self.as_subject(object, start)?,
                    predicate.clone(),
                    subject.clone(),
                ),
            };
            queue.push_back(triple);

            if !self.check(&TokenKind::Comma)? {
                return Ok(());
            }
            self.advance()?;
        }
    }

    /// Any node: IRI, blank node, collection or literal.
    fn term(&mut self, queue: &mut VecDeque<Triple>) -> Result<Term> {
        let Token { kind, start } = self.advance()?;
        match kind {
            TokenKind::Iri(reference) => Ok(Term::Iri(self.resolve(&reference))),
            TokenKind::PrefixedName { prefix, local } => {
                Ok(Term::Iri(self.expand(&prefix, &local, start)?))
            }
            TokenKind::BlankNodeLabel(label) => Ok(Term::BlankNode(self.bnodes.labeled(&label))),
            TokenKind::Anon => Ok(Term::BlankNode(self.bnodes.fresh())),
            TokenKind::LBracket => self.blank_node_property_list(queue).map(Term::BlankNode),
            TokenKind::LParen => self.collection(queue),
            TokenKind::Nil => Ok(Term::Iri(Iri::new(rdf::NIL))),
            TokenKind::String(lexical) => self.literal_suffix(lexical).map(Term::Literal),
            TokenKind::Integer(lexical) => Ok(typed(lexical, xsd::INTEGER)),
            TokenKind::Decimal(lexical) => Ok(typed(lexical, xsd::DECIMAL)),
            TokenKind::Double(lexical) => Ok(typed(lexical, xsd::DOUBLE)),
            TokenKind::KwTrue => Ok(typed("true".to_owned(), xsd::BOOLEAN)),
            TokenKind::KwFalse => Ok(typed("false".to_owned(), xsd::BOOLEAN)),
            TokenKind::LBrace => Err(self.unsupported_n3(start, "formula")),
            TokenKind::Variable(name) => Err(self.unsupported_n3(start, &format!("variable ?{name}"))),
            TokenKind::Quantifier(keyword) if self.dialect == Dialect::N3 => {
                Err(self.unsupported_n3(start, &format!("@{keyword}")))
            }
            other => Err(self.error(start, format!("expected a term, found {other}"))),
        }
    }

    fn unsupported_n3(&self, start: usize, construct: &str) -> ParseError {
        self.error(
            start,
            format!("N3 {construct} has no representation as RDF triples"),
        )
    }

    /// Language tag or datatype following a string.
    fn literal_suffix(&mut self, lexical: String) -> Result<Literal> {
        if self.check(&TokenKind::LangTag(String::new()))? {
            let Token { kind, .. } = self.advance()?;
            if let TokenKind::LangTag(tag) = kind {
                return Ok(Literal::language_tagged(lexical, Language::new(tag)));
            }
        }
        if self.check(&TokenKind::DoubleCaret)? {
            self.advance()?;
            let datatype = self.predicate_iri()?;
            return Ok(Literal::typed(lexical, datatype));
        }
        Ok(Literal::simple(lexical))
    }

    /// `[ predicateObjectList ]`, after the `[`.
    fn blank_node_property_list(&mut self, queue: &mut VecDeque<Triple>) -> Result<BlankNode> {
        let node = self.bnodes.fresh();
        if !self.check(&TokenKind::RBracket)? {
            self.predicate_object_list(&Subject::BlankNode(node.clone()), queue)?;
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(node)
    }

    /// `( item* )`, after the `(`.
    fn collection(&mut self, queue: &mut VecDeque<Triple>) -> Result<Term> {
        if self.check(&TokenKind::RParen)? {
            self.advance()?;
            return Ok(Term::Iri(Iri::new(rdf::NIL)));
        }

        let head = self.bnodes.fresh();
        let mut current = head.clone();
        loop {
            let item = self.term(queue)?;
            queue.push_back(Triple::new(current.clone(), Iri::new(rdf::FIRST), item));

            if self.check(&TokenKind::RParen)? {
                self.advance()?;
                queue.push_back(Triple::new(current, Iri::new(rdf::REST), Iri::new(rdf::NIL)));
                return Ok(Term::BlankNode(head));
            }
            let next = self.bnodes.fresh();
            queue.push_back(Triple::new(current, Iri::new(rdf::REST), next.clone()));
            current = next;
        }
    }

    // IRIs

    fn resolve(&self, reference: &str) -> Iri {
        Iri::new(iri::resolve(&self.base, reference))
    }

    fn expand(&self, prefix: &str, local: &str, start: usize) -> Result<Iri> {
        match self.prefixes.get(prefix) {
            Some(namespace) => Ok(Iri::new(format!("{namespace}{local}"))),
            // N3 predeclares the empty prefix as the document itself.
            None if prefix.is_empty() && self.dialect == Dialect::N3 => {
                Ok(Iri::new(format!("{}{local}", iri::resolve(&self.base, "#"))))
            }
            None => Err(self.error(start, format!("undeclared prefix '{prefix}:'"))),
        }
    }
}

fn typed(lexical: String, datatype: &str) -> Term {
    Term::Literal(Literal::typed(lexical, Iri::new(datatype)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Position;
    use crate::grammar::StatementStream;

    const BASE: &str = "http://example.org/doc";

    fn parse(text: &str, dialect: Dialect) -> Vec<Result<Triple>> {
        let parser = Parser::new(text.to_owned(), &Iri::new(BASE), dialect);
        StatementStream::new(parser).collect()
    }

    fn turtle(text: &str) -> Vec<Triple> {
        parse(text, Dialect::Turtle)
            .into_iter()
            .map(std::result::Result::unwrap)
            .collect()
    }

    fn n3(text: &str) -> Vec<Triple> {
        parse(text, Dialect::N3).into_iter().map(std::result::Result::unwrap).collect()
    }

    fn last_error(text: &str, dialect: Dialect) -> SyntaxError {
        match parse(text, dialect).pop() {
            Some(Err(ParseError::Syntax(err))) => err,
            other => unreachable!("expected a syntax error, got {other:?}"),
        }
    }

    fn iri(value: &str) -> Iri {
        Iri::new(value)
    }

    #[test]
    fn prefixes_and_the_a_keyword() {
        let triples = turtle(
            "@prefix ex: <http://example.org/> .\n\
             PREFIX foaf: <http://xmlns.com/foaf/0.1/>\n\
             ex:alice a foaf:Person ; foaf:name \"Alice\" , \"Ally\"@EN .",
        );
        assert_eq!(triples.len(), 3);
        assert_eq!(triples[0].predicate, iri(rdf::TYPE));
        assert_eq!(triples[0].subject, Subject::Iri(iri("http://example.org/alice")));
        let ally = triples[2].object.as_literal().unwrap();
        assert_eq!(ally.language().unwrap().as_str(), "en");
    }

    #[test]
    fn relative_references_follow_the_base() {
        let triples = turtle(
            "<#a> <p> <../x> .\n\
             @base <http://other.org/dir/> .\n\
             <b> <p> <> .\n\
             BASE <sub/>\n\
             <c> <p> <d> .",
        );
        assert_eq!(triples[0].subject, Subject::Iri(iri("http://example.org/doc#a")));
        assert_eq!(triples[0].object, Term::Iri(iri("http://example.org/x")));
        assert_eq!(triples[1].subject, Subject::Iri(iri("http://other.org/dir/b")));
        assert_eq!(triples[1].object, Term::Iri(iri("http://other.org/dir/")));
        assert_eq!(triples[2].subject, Subject::Iri(iri("http://other.org/dir/sub/c")));
    }

    #[test]
    fn numeric_and_boolean_shorthands() {
        let triples = turtle("<s> <p> 42, -1.50, 1.0e3, true .");
        let forms: Vec<_> = triples
            .iter()
            .map(|t| {
                let literal = t.object.as_literal().unwrap();
                (literal.lexical_form().to_owned(), literal.datatype().as_str().to_owned())
            })
            .collect();
        assert_eq!(
            forms,
            vec![
                ("42".to_owned(), xsd::INTEGER.to_owned()),
                ("-1.50".to_owned(), xsd::DECIMAL.to_owned()),
                ("1.0e3".to_owned(), xsd::DOUBLE.to_owned()),
                ("true".to_owned(), xsd::BOOLEAN.to_owned()),
            ]
        );
    }

    #[test]
    fn datatypes_may_be_prefixed() {
        let triples = turtle(
            "@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n<s> <p> \"5\"^^xsd:int .",
        );
        let literal = triples[0].object.as_literal().unwrap();
        assert_eq!(literal.datatype().as_str(), "http://www.w3.org/2001/XMLSchema#int");
    }

    #[test]
    fn directive_names_are_valid_language_tags() {
        let triples = turtle("<s> <p> \"x\"@base , \"y\"@prefix .\n@prefix ex: <http://e/> .");
        assert_eq!(triples.len(), 2);
        let tags: Vec<_> = triples
            .iter()
            .map(|t| t.object.as_literal().unwrap().language().unwrap().as_str().to_owned())
            .collect();
        assert_eq!(tags, ["base", "prefix"]);
    }

    #[test]
    fn blank_node_property_lists() {
        let triples = turtle("[ <p> <o> ] <q> [ <r> \"v\" ] .\n[ <p> <o2> ] .");
        assert_eq!(triples.len(), 4);
        let outer = triples[0].subject.as_blank_node().unwrap();
        assert_eq!(triples[2].subject.as_blank_node(), Some(outer));
        assert_eq!(triples[2].object.as_blank_node(), triples[1].subject.as_blank_node());
        assert_ne!(triples[3].subject.as_blank_node(), Some(outer));
    }

    #[test]
    fn collections() {
        let triples = turtle("<s> <p> (1 <a>) . <s> <q> () .");
        assert_eq!(triples.len(), 6);
        assert_eq!(triples[0].predicate, iri(rdf::FIRST));
        assert_eq!(triples[1].predicate, iri(rdf::REST));
        assert_eq!(triples[3].object, Term::Iri(iri(rdf::NIL)));
        assert_eq!(
            triples[4].object.as_blank_node(),
            triples[0].subject.as_blank_node()
        );
        assert_eq!(triples[5].object, Term::Iri(iri(rdf::NIL)));
    }

    #[test]
    fn trailing_semicolons_are_allowed() {
        assert_eq!(turtle("<s> <p> <o> ;; .").len(), 1);
    }

    #[test]
    fn undeclared_prefix() {
        let err = last_error("<s> <p> <o> .\nex:a <p> <o> .", Dialect::Turtle);
        assert!(err.message.contains("undeclared prefix 'ex:'"));
        assert!(matches!(err.position, Position::Text { line: 2, column: 1, .. }));
    }

    #[test]
    fn statements_before_an_error_survive() {
        let results = parse("<s> <p> <o> .\n<s> <p> \"unterminated .\n", Dialect::Turtle);
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn missing_dot_is_an_error() {
        let err = last_error("<s> <p> <o>", Dialect::Turtle);
        assert!(err.message.contains("expected '.'"));
    }

    #[test]
    fn literal_subjects_are_rejected() {
        let err = last_error("\"x\" <p> <o> .", Dialect::Turtle);
        assert!(err.message.contains("literal cannot be a subject"));
    }

    #[test]
    fn n3_shorthands() {
        let triples = n3(
            "@prefix : <http://e/> .\n\
             :a = :b .\n\
             :a => :c .\n\
             :a <= :d .\n\
             :a has :p :e .\n\
             :a is :p of :f .",
        );
        assert_eq!(
            triples,
            vec![
                Triple::new(iri("http://e/a"), iri(owl::SAME_AS), iri("http://e/b")),
                Triple::new(iri("http://e/a"), iri(log::IMPLIES), iri("http://e/c")),
                Triple::new(iri("http://e/d"), iri(log::IMPLIES), iri("http://e/a")),
                Triple::new(iri("http://e/a"), iri("http://e/p"), iri("http://e/e")),
                Triple::new(iri("http://e/f"), iri("http://e/p"), iri("http://e/a")),
            ]
        );
    }

    #[test]
    fn n3_default_prefix_is_the_document() {
        let triples = n3(":a :b :c .");
        assert_eq!(triples[0].subject, Subject::Iri(iri("http://example.org/doc#a")));
    }

    #[test]
    fn n3_constructs_without_triples_are_errors() {
        let err = last_error("{ :a :b :c } => :d .", Dialect::N3);
        assert!(err.message.contains("formula"));
        let err = last_error(":a :b ?x .", Dialect::N3);
        assert!(err.message.contains("variable ?x"));
        let err = last_error("@forAll :x .", Dialect::N3);
        assert!(err.message.contains("@forAll"));
    }
}
