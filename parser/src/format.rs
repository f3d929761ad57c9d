//! Content-type resolution.
//!
//! Maps a media type (optionally followed by `;` parameters) to the grammar
//! that parses it. The table is fixed; matching is exact and case-sensitive
//! once parameters are stripped.

use std::fmt;

use crate::error::UnsupportedFormat;

/// Media types recognized by the parsers.
pub mod media_type {
    /// RDF/XML.
    pub const RDF_XML: &str = "application/rdf+xml";
    /// Turtle.
    pub const TURTLE: &str = "text/turtle";
    /// Turtle, legacy media type.
    pub const X_TURTLE: &str = "application/x-turtle";
    /// Notation 3.
    pub const N3: &str = "text/rdf+n3";
    /// N-Triples.
    pub const N_TRIPLE: &str = "application/n-triples";
    /// JSON-LD.
    pub const JSON_LD: &str = "application/ld+json";
}

/// Identifies one of the supported grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarId {
    /// RDF 1.1 XML syntax.
    RdfXml,
    /// RDF 1.1 Turtle.
    Turtle,
    /// Notation 3, restricted to constructs with a plain-triple meaning.
    N3,
    /// RDF 1.1 N-Triples.
    NTriples,
    /// JSON-LD 1.1.
    JsonLd,
}

/// Every recognized content type and the grammar it selects.
const FORMAT_TABLE: &[(&str, GrammarId)] = &[
    (media_type::RDF_XML, GrammarId::RdfXml),
    (media_type::TURTLE, GrammarId::Turtle),
    (media_type::X_TURTLE, GrammarId::Turtle),
    (media_type::N3, GrammarId::N3),
    (media_type::N_TRIPLE, GrammarId::NTriples),
    (media_type::JSON_LD, GrammarId::JsonLd),
];

impl GrammarId {
    /// All grammars, in registry order.
    pub const ALL: [GrammarId; 5] = [
        GrammarId::RdfXml,
        GrammarId::Turtle,
        GrammarId::N3,
        GrammarId::NTriples,
        GrammarId::JsonLd,
    ];

    /// Returns the canonical media type of this grammar.
    #[must_use]
    pub fn media_type(self) -> &'static str {
        match self {
            GrammarId::RdfXml => media_type::RDF_XML,
            GrammarId::Turtle => media_type::TURTLE,
            GrammarId::N3 => media_type::N3,
            GrammarId::NTriples => media_type::N_TRIPLE,
            GrammarId::JsonLd => media_type::JSON_LD,
        }
    }

    /// Guesses the grammar from a file extension (without the dot).
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "rdf" | "owl" | "xml" => Some(GrammarId::RdfXml),
            "ttl" => Some(GrammarId::Turtle),
            "n3" => Some(GrammarId::N3),
            "nt" => Some(GrammarId::NTriples),
            "jsonld" | "json" => Some(GrammarId::JsonLd),
            _ => None,
        }
    }
}

impl fmt::Display for GrammarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GrammarId::RdfXml => "RDF/XML",
            GrammarId::Turtle => "Turtle",
            GrammarId::N3 => "N3",
            GrammarId::NTriples => "N-Triples",
            GrammarId::JsonLd => "JSON-LD",
        };
        f.write_str(name)
    }
}

/// Resolves a content type to its grammar.
///
/// Everything from the first `;` on is discarded before the lookup, so
/// `text/turtle;charset=UTF-8` selects Turtle.
///
/// # Errors
///
/// Returns [`UnsupportedFormat`] carrying the original `content_type` when
/// the stripped value matches no entry.
pub fn resolve(content_type: &str) -> Result<GrammarId, UnsupportedFormat> {
    let stripped = match content_type.find(';') {
        Some(pos) => &content_type[..pos],
        None => content_type,
    };
    FORMAT_TABLE
        .iter()
        .find(|(media_type, _)| *media_type == stripped)
        .map(|&(_, grammar)| grammar)
        .ok_or_else(|| UnsupportedFormat {
            content_type: content_type.to_owned(),
        })
}

/// Returns every recognized content type, in table order.
pub fn supported_formats() -> impl Iterator<Item = &'static str> {
    FORMAT_TABLE.iter().map(|&(media_type, _)| media_type)
}
