//! Well-known vocabulary IRIs referenced by the grammar parsers.

/// The RDF namespace (`rdf:`).
pub mod rdf {
    /// Namespace IRI.
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// `rdf:type`
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdf:first`
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    /// `rdf:rest`
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    /// `rdf:nil`
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    /// `rdf:langString`, the datatype of every language-tagged literal.
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
    /// `rdf:XMLLiteral`
    pub const XML_LITERAL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral";
    /// `rdf:JSON`
    pub const JSON: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON";
    /// `rdf:Statement`
    pub const STATEMENT: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Statement";
    /// `rdf:subject`
    pub const SUBJECT: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#subject";
    /// `rdf:predicate`
    pub const PREDICATE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#predicate";
    /// `rdf:object`
    pub const OBJECT: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#object";
    /// `rdf:RDF`, the optional RDF/XML document element.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#RDF";
    /// `rdf:Description`, the untyped RDF/XML node element.
    pub const DESCRIPTION: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Description";
    /// `rdf:li`, the auto-numbered container membership property.
    pub const LI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#li";
}

/// XML Schema datatypes (`xsd:`).
pub mod xsd {
    /// `xsd:string`, the datatype of simple literals.
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// `xsd:boolean`
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    /// `xsd:integer`
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// `xsd:decimal`
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    /// `xsd:double`
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
}

/// OWL terms produced by N3 shorthand.
pub mod owl {
    /// `owl:sameAs`, written `=` in N3.
    pub const SAME_AS: &str = "http://www.w3.org/2002/07/owl#sameAs";
}

/// The N3 logic namespace (`log:`).
pub mod log {
    /// `log:implies`, written `=>` in N3.
    pub const IMPLIES: &str = "http://www.w3.org/2000/10/swap/log#implies";
}

/// The XML namespace bound to the `xml:` prefix.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
