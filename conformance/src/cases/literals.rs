//! Plain, language-tagged and typed literals, including the Turtle and
//! JSON-LD native forms.

use super::Case;

/// The literal case.
pub const CASE: Case = Case {
    name: "literals",
    documents: &[
        ("application/n-triples", NTRIPLES),
        ("text/turtle", TURTLE),
        ("text/rdf+n3", TURTLE),
        ("application/ld+json", JSONLD),
        ("application/rdf+xml", RDFXML),
    ],
};

const NTRIPLES: &str = r##"
<http://example.org/s> <http://example.org/p> "plain" .
<http://example.org/s> <http://example.org/p> "tagged"@fr .
<http://example.org/s> <http://example.org/n> "1"^^<http://www.w3.org/2001/XMLSchema#integer> .
<http://example.org/s> <http://example.org/b> "true"^^<http://www.w3.org/2001/XMLSchema#boolean> .
<http://example.org/s> <http://example.org/d> "1.5"^^<http://www.w3.org/2001/XMLSchema#decimal> .
"##;

const TURTLE: &str = r##"
@prefix ex: <http://example.org/> .

ex:s ex:p "plain", "tagged"@fr ;
    ex:n 1 ;
    ex:b true ;
    ex:d 1.5 .
"##;

const JSONLD: &str = r##"{
  "@context": {"@vocab": "http://example.org/"},
  "@id": "http://example.org/s",
  "p": ["plain", {"@value": "tagged", "@language": "fr"}],
  "n": 1,
  "b": true,
  "d": {"@value": "1.5", "@type": "http://www.w3.org/2001/XMLSchema#decimal"}
}"##;

const RDFXML: &str = r##"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:ex="http://example.org/">
  <rdf:Description rdf:about="http://example.org/s" ex:p="plain">
    <ex:p xml:lang="fr">tagged</ex:p>
    <ex:n rdf:datatype="http://www.w3.org/2001/XMLSchema#integer">1</ex:n>
    <ex:b rdf:datatype="http://www.w3.org/2001/XMLSchema#boolean">true</ex:b>
    <ex:d rdf:datatype="http://www.w3.org/2001/XMLSchema#decimal">1.5</ex:d>
  </rdf:Description>
</rdf:RDF>
"##;
