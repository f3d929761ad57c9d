//! Parse orchestration: content type → grammar → triples into a graph.

use std::io::{BufReader, Read};
use std::sync::OnceLock;

use tracing::debug;

use crate::error::{ParseError, Result, UnsupportedFormat};
use crate::format::{self, GrammarId};
use crate::grammar::jsonld::JsonLdParser;
use crate::grammar::ntriples::NTriplesParser;
use crate::grammar::rdfxml::RdfXmlParser;
use crate::grammar::turtle::{N3Parser, TurtleParser};
use crate::grammar::GrammarParser;
use crate::graph::Graph;
use crate::iri;
use crate::model::Iri;

/// Parses serialized RDF into a caller-owned [`Graph`].
///
/// Obtain the shared instance through [`parsing_provider`]. The grammar
/// registry it holds is immutable.
pub struct SerializedFormParser {
    registry: Vec<Box<dyn GrammarParser>>,
}

impl std::fmt::Debug for SerializedFormParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerializedFormParser")
            .field(
                "grammars",
                &self.registry.iter().map(|p| p.grammar()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Returns the process-wide parser, building its registry on first use.
#[must_use]
pub fn parsing_provider() -> &'static SerializedFormParser {
    static PROVIDER: OnceLock<SerializedFormParser> = OnceLock::new();
    PROVIDER.get_or_init(SerializedFormParser::with_builtin_grammars)
}

impl SerializedFormParser {
    fn with_builtin_grammars() -> Self {
        let registry: Vec<Box<dyn GrammarParser>> = vec![
            Box::new(RdfXmlParser),
            Box::new(TurtleParser),
            Box::new(N3Parser),
            Box::new(NTriplesParser),
            Box::new(JsonLdParser),
        ];
        Self { registry }
    }

    /// The registered parser for `grammar`.
    #[must_use]
    pub fn parser_for(&self, grammar: GrammarId) -> Option<&dyn GrammarParser> {
        self.registry
            .iter()
            .find(|parser| parser.grammar() == grammar)
            .map(|parser| &**parser)
    }

    /// Every content type [`parse`](Self::parse) accepts, parameters
    /// excluded.
    pub fn supported_formats(&self) -> impl Iterator<Item = &'static str> + '_ {
        format::supported_formats().filter(|media_type| {
            format::resolve(media_type)
                .ok()
                .and_then(|grammar| self.parser_for(grammar))
                .is_some()
        })
    }

    /// Parses `input` as `content_type` and inserts every triple into
    /// `target`, in document order.
    ///
    /// Relative references are resolved against `base`, or against
    /// `http://relative-uri.fake/` when it is `None`.
    ///
    /// # Errors
    ///
    /// - [`ParseError::UnsupportedFormat`] if `content_type` names no known
    ///   syntax; nothing is inserted.
    /// - [`ParseError::InvalidBase`] if `base` is not absolute; nothing is
    ///   inserted.
    /// - [`ParseError::Syntax`] on the first grammar violation. Triples
    ///   parsed before it stay in `target`.
    /// - [`ParseError::Io`] if reading `input` fails.
    pub fn parse<G, R>(
        &self,
        target: &mut G,
        input: R,
        content_type: &str,
        base: Option<&Iri>,
    ) -> Result<()>
    where
        G: Graph + ?Sized,
        R: Read,
    {
        let grammar = format::resolve(content_type)?;
        let base = match base {
            None => Iri::new(iri::FAKE_BASE),
            Some(base) if iri::is_absolute(base.as_str()) => base.clone(),
            Some(base) => return Err(ParseError::InvalidBase(base.as_str().to_owned())),
        };
        let parser = self.parser_for(grammar).ok_or_else(|| UnsupportedFormat {
            content_type: content_type.to_owned(),
        })?;

        debug!(%grammar, %base, "parsing serialized graph");
        let mut inserted = 0usize;
        for triple in parser.parse(Box::new(BufReader::new(input)), &base) {
            match triple {
                Ok(triple) => {
                    target.insert(triple);
                    inserted += 1;
                }
                Err(err) => {
                    debug!(%grammar, inserted, error = %err, "parse failed");
                    return Err(err);
                }
            }
        }
        debug!(%grammar, triples = inserted, "parsed serialized graph");
        Ok(())
    }
}
