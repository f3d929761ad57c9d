//! Multi-format RDF deserialization.
//!
//! `serializedform` reads one RDF document (RDF/XML, Turtle, N3, N-Triples
//! or JSON-LD) from a byte stream and inserts its triples into a graph the
//! caller owns. The syntax is chosen from a content type; relative
//! references resolve against an optional base IRI.
//!
//! # Entry Point
//!
//! ```
//! use serializedform::{parsing_provider, SimpleGraph};
//!
//! let turtle = "@prefix ex: <http://example.org/> .\nex:s ex:p \"o\"@en .";
//! let mut graph = SimpleGraph::new();
//! parsing_provider()
//!     .parse(&mut graph, turtle.as_bytes(), "text/turtle;charset=UTF-8", None)
//!     .unwrap();
//! assert_eq!(graph.len(), 1);
//! ```
//!
//! # Formats
//!
//! | Content type | Grammar |
//! |---|---|
//! | `application/rdf+xml` | RDF/XML |
//! | `text/turtle`, `application/x-turtle` | Turtle |
//! | `text/rdf+n3` | N3 (plain-triple subset) |
//! | `application/n-triples` | N-Triples |
//! | `application/ld+json` | JSON-LD (local contexts) |
//!
//! Anything after a `;` in the content type is ignored.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod format;
pub mod grammar;
pub mod graph;
pub mod iri;
mod isomorphism;
pub mod model;
pub mod provider;
pub mod vocab;

pub use error::{ParseError, Position, Result, SyntaxError, UnsupportedFormat};
pub use format::{resolve, supported_formats, GrammarId};
pub use grammar::{GrammarParser, TripleStream};
pub use graph::{Graph, ImmutableGraph, SimpleGraph};
pub use model::{BlankNode, Iri, Language, Literal, Subject, Term, Triple};
pub use provider::{parsing_provider, SerializedFormParser};
