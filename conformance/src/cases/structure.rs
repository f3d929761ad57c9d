//! Nested blank nodes, a collection and the empty list.

use super::Case;

/// The structural case.
pub const CASE: Case = Case {
    name: "structure",
    documents: &[
        ("application/n-triples", NTRIPLES),
        ("text/turtle", TURTLE),
        ("text/rdf+n3", N3),
        ("application/ld+json", JSONLD),
        ("application/rdf+xml", RDFXML),
    ],
};

const NTRIPLES: &str = r##"
<http://example.org/s> <http://example.org/items> _:l1 .
_:l1 <http://www.w3.org/1999/02/22-rdf-syntax-ns#first> <http://example.org/a> .
_:l1 <http://www.w3.org/1999/02/22-rdf-syntax-ns#rest> _:l2 .
_:l2 <http://www.w3.org/1999/02/22-rdf-syntax-ns#first> <http://example.org/b> .
_:l2 <http://www.w3.org/1999/02/22-rdf-syntax-ns#rest> <http://www.w3.org/1999/02/22-rdf-syntax-ns#nil> .
<http://example.org/s> <http://example.org/none> <http://www.w3.org/1999/02/22-rdf-syntax-ns#nil> .
<http://example.org/s> <http://example.org/knows> _:x .
_:x <http://example.org/name> "x" .
"##;

const TURTLE: &str = r##"
@prefix ex: <http://example.org/> .

ex:s ex:items ( ex:a ex:b ) ;
    ex:none () ;
    ex:knows [ ex:name "x" ] .
"##;

const N3: &str = r##"
@prefix ex: <http://example.org/> .

ex:s ex:items ( ex:a ex:b ) .
ex:s ex:none () .
[ ex:name "x" ] is ex:knows of ex:s .
"##;

const JSONLD: &str = r##"{
  "@context": {"@vocab": "http://example.org/"},
  "@id": "http://example.org/s",
  "items": {"@list": [{"@id": "http://example.org/a"}, {"@id": "http://example.org/b"}]},
  "none": {"@list": []},
  "knows": {"name": "x"}
}"##;

const RDFXML: &str = r##"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:ex="http://example.org/">
  <rdf:Description rdf:about="http://example.org/s">
    <ex:items rdf:parseType="Collection">
      <rdf:Description rdf:about="http://example.org/a"/>
      <rdf:Description rdf:about="http://example.org/b"/>
    </ex:items>
    <ex:none rdf:resource="http://www.w3.org/1999/02/22-rdf-syntax-ns#nil"/>
    <ex:knows rdf:parseType="Resource">
      <ex:name>x</ex:name>
    </ex:knows>
  </rdf:Description>
</rdf:RDF>
"##;
