//! Relative references resolved against the placeholder base.

use super::Case;

/// The relative-reference case.
pub const CASE: Case = Case {
    name: "relative",
    documents: &[
        ("application/n-triples", NTRIPLES),
        ("text/turtle", TURTLE),
        ("text/rdf+n3", TURTLE),
        ("application/ld+json", JSONLD),
        ("application/rdf+xml", RDFXML),
    ],
};

const NTRIPLES: &str = r##"
<http://relative-uri.fake/doc#s> <http://relative-uri.fake/p> <http://relative-uri.fake/o> .
"##;

const TURTLE: &str = "<doc#s> <p> <o> .\n";

const JSONLD: &str = r##"{
  "@context": {"p": {"@id": "http://relative-uri.fake/p", "@type": "@id"}},
  "@id": "doc#s",
  "p": "o"
}"##;

const RDFXML: &str = r##"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rel="http://relative-uri.fake/">
  <rdf:Description rdf:about="doc#s">
    <rel:p rdf:resource="o"/>
  </rdf:Description>
</rdf:RDF>
"##;
