//! RDF value types.
//!
//! These are the terms the grammar parsers build and a [`Graph`](crate::Graph)
//! receives: IRIs, blank nodes, literals and the triples assembled from them.
//! All types are owned and cheap to compare; equality is term equality as
//! defined by RDF 1.1 Concepts (lexical form, datatype and language tag for
//! literals, label for blank nodes).

use std::fmt;

use crate::vocab::{rdf, xsd};

/// An IRI, stored in its Unicode form (no percent-encoding of non-ASCII).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(String);

impl Iri {
    /// Wraps an IRI string. The string is taken as-is; no resolution or
    /// validation happens here.
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// Returns the Unicode string form of the IRI.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the IRI and returns its string form.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl From<&str> for Iri {
    fn from(iri: &str) -> Self {
        Self::new(iri)
    }
}

impl From<String> for Iri {
    fn from(iri: String) -> Self {
        Self(iri)
    }
}

/// A blank node. Its label is only meaningful inside the graph that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankNode(String);

impl BlankNode {
    /// Creates a blank node with the given label (without the `_:` prefix).
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label without the `_:` prefix.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// A BCP 47 language tag, normalized to lower case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Language(String);

impl Language {
    /// Creates a language tag. Tags compare case-insensitively, so the tag
    /// is stored lower-cased.
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().to_ascii_lowercase())
    }

    /// Returns the normalized tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An RDF literal.
///
/// Every literal has a datatype. Simple literals carry `xsd:string`,
/// language-tagged literals carry `rdf:langString`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    lexical_form: String,
    datatype: Iri,
    language: Option<Language>,
}

impl Literal {
    /// Creates a simple literal (datatype `xsd:string`, no language tag).
    pub fn simple(lexical_form: impl Into<String>) -> Self {
        Self {
            lexical_form: lexical_form.into(),
            datatype: Iri::new(xsd::STRING),
            language: None,
        }
    }

    /// Creates a literal with an explicit datatype.
    pub fn typed(lexical_form: impl Into<String>, datatype: Iri) -> Self {
        Self {
            lexical_form: lexical_form.into(),
            datatype,
            language: None,
        }
    }

    /// Creates a language-tagged literal (datatype `rdf:langString`).
    pub fn language_tagged(lexical_form: impl Into<String>, language: Language) -> Self {
        Self {
            lexical_form: lexical_form.into(),
            datatype: Iri::new(rdf::LANG_STRING),
            language: Some(language),
        }
    }

    /// Returns the lexical form.
    #[must_use]
    pub fn lexical_form(&self) -> &str {
        &self.lexical_form
    }

    /// Returns the datatype IRI.
    #[must_use]
    pub fn datatype(&self) -> &Iri {
        &self.datatype
    }

    /// Returns the language tag, if any.
    #[must_use]
    pub fn language(&self) -> Option<&Language> {
        self.language.as_ref()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.lexical_form.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                c => write!(f, "{c}")?,
            }
        }
        f.write_str("\"")?;
        match &self.language {
            Some(language) => write!(f, "@{language}"),
            None if self.datatype.as_str() == xsd::STRING => Ok(()),
            None => write!(f, "^^{}", self.datatype),
        }
    }
}

/// The subject position of a triple: an IRI or a blank node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subject {
    /// A named resource.
    Iri(Iri),
    /// An anonymous resource.
    BlankNode(BlankNode),
}

impl Subject {
    /// Returns the blank node if this subject is one.
    #[must_use]
    pub fn as_blank_node(&self) -> Option<&BlankNode> {
        match self {
            Subject::BlankNode(node) => Some(node),
            Subject::Iri(_) => None,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Iri(iri) => write!(f, "{iri}"),
            Subject::BlankNode(node) => write!(f, "{node}"),
        }
    }
}

impl From<Iri> for Subject {
    fn from(iri: Iri) -> Self {
        Subject::Iri(iri)
    }
}

impl From<BlankNode> for Subject {
    fn from(node: BlankNode) -> Self {
        Subject::BlankNode(node)
    }
}

/// Any RDF term; the object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// A named resource.
    Iri(Iri),
    /// An anonymous resource.
    BlankNode(BlankNode),
    /// A literal value.
    Literal(Literal),
}

impl Term {
    /// Returns the blank node if this term is one.
    #[must_use]
    pub fn as_blank_node(&self) -> Option<&BlankNode> {
        match self {
            Term::BlankNode(node) => Some(node),
            _ => None,
        }
    }

    /// Returns the literal if this term is one.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// Returns the IRI if this term is one.
    #[must_use]
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "{iri}"),
            Term::BlankNode(node) => write!(f, "{node}"),
            Term::Literal(literal) => write!(f, "{literal}"),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<BlankNode> for Term {
    fn from(node: BlankNode) -> Self {
        Term::BlankNode(node)
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}

impl From<Subject> for Term {
    fn from(subject: Subject) -> Self {
        match subject {
            Subject::Iri(iri) => Term::Iri(iri),
            Subject::BlankNode(node) => Term::BlankNode(node),
        }
    }
}

/// An RDF statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    /// The resource the statement is about.
    pub subject: Subject,
    /// The property.
    pub predicate: Iri,
    /// The value.
    pub object: Term,
}

impl Triple {
    /// Assembles a triple.
    pub fn new(subject: impl Into<Subject>, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
