//! RDF 1.1 XML syntax.
//!
//! Driven by the `quick-xml` pull reader. Every open element has a frame on
//! a stack describing what it is (document element, node element, or one of
//! the property element forms) plus an XML scope carrying the in-scope
//! namespaces, `xml:base` and `xml:lang`.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{failed_stream, read_document, BlankNodeAllocator, GrammarParser, TripleStream};
use crate::error::{ParseError, SyntaxError};
use crate::format::GrammarId;
use crate::iri;
use crate::model::{BlankNode, Iri, Language, Literal, Subject, Term, Triple};
use crate::vocab::{rdf, XML_NS};

type Result<T> = std::result::Result<T, ParseError>;

/// Parser for `application/rdf+xml`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RdfXmlParser;

impl GrammarParser for RdfXmlParser {
    fn grammar(&self) -> GrammarId {
        GrammarId::RdfXml
    }

    fn parse<'a>(&self, input: Box<dyn BufRead + 'a>, base: &Iri) -> TripleStream<'a> {
        let text = match read_document(input) {
            Ok(text) => text,
            Err(err) => return failed_stream(err),
        };
        let mut document = Document::new(&text, base);
        let outcome = document.read();
        Box::new(document.triples.into_iter().map(Ok).chain(outcome.err().map(Err)))
    }
}

/// Namespaces, base and language declared on one element.
#[derive(Debug, Clone)]
struct Scope {
    namespaces: Vec<(String, String)>,
    base: String,
    lang: Option<String>,
}

#[derive(Debug)]
enum Frame {
    /// `rdf:RDF`
    Root,
    /// A node element, or the implicit node of `parseType="Resource"`.
    Node { subject: Subject, li: u64 },
    /// A property element whose object is a literal or a nested node element.
    Property {
        subject: Subject,
        predicate: Iri,
        reify: Option<Iri>,
        datatype: Option<Iri>,
        lang: Option<String>,
        text: String,
        object: Option<Subject>,
    },
    /// `parseType="Literal"`; content starts at the given offset, `None`
    /// for an empty element.
    Literal {
        subject: Subject,
        predicate: Iri,
        reify: Option<Iri>,
        content_start: Option<usize>,
    },
    /// `parseType="Collection"`
    Collection {
        subject: Subject,
        predicate: Iri,
        reify: Option<Iri>,
        items: Vec<Subject>,
    },
    /// A property element already emitted from its attributes; must stay
    /// empty.
    Closed,
}

/// What a newly opened element is, given its parent.
enum Role {
    Root,
    Node,
    Property { subject: Subject, predicate: Iri },
    Misplaced,
}

/// RDF-namespace attributes of one element, plus its property attributes.
#[derive(Debug, Default)]
struct Attributes {
    about: Option<String>,
    id: Option<String>,
    node_id: Option<String>,
    resource: Option<String>,
    datatype: Option<String>,
    parse_type: Option<String>,
    rdf_type: Option<String>,
    properties: Vec<(Iri, String)>,
}

struct Document<'t> {
    text: &'t str,
    reader: Reader<&'t [u8]>,
    root: Scope,
    scopes: Vec<Scope>,
    frames: Vec<Frame>,
    bnodes: BlankNodeAllocator,
    triples: Vec<Triple>,
    /// Byte offset where the event being handled starts.
    event_start: usize,
    /// Nesting depth inside a `parseType="Literal"` element.
    literal_depth: Option<usize>,
    /// General entities declared in the DOCTYPE internal subset.
    entities: Vec<(String, String)>,
}

impl<'t> Document<'t> {
    fn new(text: &'t str, base: &Iri) -> Self {
        Self {
            text,
            reader: Reader::from_str(text),
            root: Scope {
                namespaces: Vec::new(),
                base: base.as_str().to_owned(),
                lang: None,
            },
            scopes: Vec::new(),
            frames: Vec::new(),
            bnodes: BlankNodeAllocator::new(),
            triples: Vec::new(),
            event_start: 0,
            literal_depth: None,
            entities: Vec::new(),
        }
    }

    fn read(&mut self) -> Result<()> {
        loop {
            self.event_start = self.reader.buffer_position();
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(err) => {
                    let offset = self.reader.buffer_position();
                    return Err(SyntaxError::at(self.text, offset, format!("malformed XML: {err}")).into());
                }
            };

            if let Some(depth) = self.literal_depth {
                match event {
                    Event::Start(_) => self.literal_depth = Some(depth + 1),
                    Event::End(_) if depth == 0 => {
                        self.literal_depth = None;
                        self.end_element()?;
                    }
                    Event::End(_) => self.literal_depth = Some(depth - 1),
                    Event::Eof => return Err(self.error("unexpected end of document")),
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(element) => self.start_element(&element, false)?,
                Event::Empty(element) => self.start_element(&element, true)?,
                Event::End(_) => self.end_element()?,
                Event::Text(text) => {
                    let content = text
                        .unescape_with(|name| resolve_entity(&self.entities, name))
                        .map_err(|err| self.error(format!("malformed text: {err}")))?;
                    self.text(&content)?;
                }
                Event::CData(data) => {
                    let content = std::str::from_utf8(&data)
                        .map_err(|_| self.error("CDATA section is not valid UTF-8"))?;
                    self.text(content)?;
                }
                Event::DocType(doctype) => {
                    let declarations = std::str::from_utf8(&doctype)
                        .map_err(|_| self.error("DOCTYPE is not valid UTF-8"))?;
                    self.entities = entity_declarations(declarations);
                }
                Event::Eof => break,
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) => {}
            }
        }

        if self.frames.is_empty() {
            Ok(())
        } else {
            Err(self.error("unexpected end of document"))
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        SyntaxError::at(self.text, self.event_start, message).into()
    }

    // Scopes and names

    fn scope(&self) -> &Scope {
        self.scopes.last().unwrap_or(&self.root)
    }

    fn namespace(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NS);
        }
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.namespaces.iter().rev())
            .find(|(declared, _)| declared == prefix)
            .map(|(_, namespace)| namespace.as_str())
    }

    fn qname_iri(&self, qname: &str) -> Result<Iri> {
        let (prefix, local) = qname.split_once(':').unwrap_or(("", qname));
        match self.namespace(prefix) {
            Some(namespace) => Ok(Iri::new(format!("{namespace}{local}"))),
            None if prefix.is_empty() => Err(self.error(format!("'{local}' is not in a namespace"))),
            None => Err(self.error(format!("undeclared namespace prefix '{prefix}'"))),
        }
    }

    fn utf8<'b>(&self, bytes: &'b [u8]) -> Result<&'b str> {
        std::str::from_utf8(bytes).map_err(|_| self.error("name is not valid UTF-8"))
    }

    fn resolve(&self, reference: &str) -> Iri {
        Iri::new(iri::resolve(&self.scope().base, reference))
    }

    /// The IRI named by `rdf:ID`.
    fn id_iri(&self, id: &str) -> Result<Iri> {
        if id.is_empty() || id.contains(':') {
            return Err(self.error(format!("'{id}' is not a valid rdf:ID")));
        }
        Ok(self.resolve(&format!("#{id}")))
    }

    fn labeled(&self, node_id: &str) -> Result<BlankNode> {
        if node_id.is_empty() || node_id.contains(':') {
            return Err(self.error(format!("'{node_id}' is not a valid rdf:nodeID")));
        }
        Ok(self.bnodes.labeled(node_id))
    }

    fn literal(&self, value: String, lang: Option<&str>) -> Literal {
        match lang {
            Some(tag) => Literal::language_tagged(value, Language::new(tag)),
            None => Literal::simple(value),
        }
    }

    /// Builds the scope of an element from its `xmlns`, `xml:base` and
    /// `xml:lang` attributes.
    fn child_scope(&self, element: &BytesStart<'_>) -> Result<Scope> {
        let parent = self.scope();
        let mut scope = Scope {
            namespaces: Vec::new(),
            base: parent.base.clone(),
            lang: parent.lang.clone(),
        };
        for attr in element.attributes() {
            let attr = attr.map_err(|err| self.error(format!("malformed attribute: {err}")))?;
            let key = self.utf8(attr.key.as_ref())?;
            if !is_xml_attribute(key) {
                continue;
            }
            let value = attr
                .unescape_value_with(|name| resolve_entity(&self.entities, name))
                .map_err(|err| self.error(format!("malformed attribute value: {err}")))?;

            if key == "xmlns" {
                scope.namespaces.push((String::new(), value.into_owned()));
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                scope.namespaces.push((prefix.to_owned(), value.into_owned()));
            } else if key == "xml:base" {
                scope.base = iri::resolve(&parent.base, &value);
            } else if key == "xml:lang" {
                scope.lang = (!value.is_empty()).then(|| value.into_owned());
            }
        }
        Ok(scope)
    }

    fn attributes(&self, element: &BytesStart<'_>) -> Result<Attributes> {
        let mut attrs = Attributes::default();
        for attr in element.attributes() {
            let attr = attr.map_err(|err| self.error(format!("malformed attribute: {err}")))?;
            let key = self.utf8(attr.key.as_ref())?;
            if is_xml_attribute(key) {
                continue;
            }
            let value = attr
                .unescape_value_with(|name| resolve_entity(&self.entities, name))
                .map_err(|err| self.error(format!("malformed attribute value: {err}")))?
                .into_owned();

            let name = if key.contains(':') {
                self.qname_iri(key)?
            } else if matches!(key, "about" | "ID" | "nodeID" | "resource" | "datatype" | "parseType") {
                Iri::new(format!("{}{key}", rdf::NS))
            } else {
                return Err(self.error(format!("unqualified attribute '{key}'")));
            };

            match name.as_str().strip_prefix(rdf::NS) {
                Some("about") => attrs.about = Some(value),
                Some("ID") => attrs.id = Some(value),
                Some("nodeID") => attrs.node_id = Some(value),
                Some("resource") => attrs.resource = Some(value),
                Some("datatype") => attrs.datatype = Some(value),
                Some("parseType") => attrs.parse_type = Some(value),
                Some("type") => attrs.rdf_type = Some(value),
                Some(
                    local @ ("li" | "Description" | "RDF" | "aboutEach" | "aboutEachPrefix"
                    | "bagID"),
                ) => {
                    return Err(self.error(format!("rdf:{local} is not allowed as an attribute")))
                }
                _ => attrs.properties.push((name, value)),
            }
        }
        Ok(attrs)
    }

    // Elements

    fn start_element(&mut self, element: &BytesStart<'_>, empty: bool) -> Result<()> {
        let scope = self.child_scope(element)?;
        self.scopes.push(scope);

        let qname = self.utf8(element.name().as_ref())?.to_owned();
        let name = self.qname_iri(&qname)?;
        let attrs = self.attributes(element)?;

        let role = match self.frames.last_mut() {
            None if name.as_str() == rdf::RDF => Role::Root,
            None | Some(Frame::Root | Frame::Property { .. } | Frame::Collection { .. }) => {
                Role::Node
            }
            Some(Frame::Node { subject, li }) => {
                let predicate = if name.as_str() == rdf::LI {
                    *li += 1;
                    Iri::new(format!("{}_{li}", rdf::NS))
                } else {
                    name.clone()
                };
                Role::Property {
                    subject: subject.clone(),
                    predicate,
                }
            }
            Some(Frame::Literal { .. } | Frame::Closed) => Role::Misplaced,
        };

        match role {
            Role::Root => self.frames.push(Frame::Root),
            Role::Node => self.node_element(&name, attrs)?,
            Role::Property { subject, predicate } => {
                self.property_element(&name, subject, predicate, attrs, empty)?;
            }
            Role::Misplaced => {
                return Err(self.error(format!("element <{qname}> is not allowed here")));
            }
        }

        if empty {
            self.end_element()?;
        }
        Ok(())
    }

    fn node_element(&mut self, name: &Iri, attrs: Attributes) -> Result<()> {
        if let Some(local) = name.as_str().strip_prefix(rdf::NS) {
            if matches!(
                local,
                "RDF" | "ID" | "about" | "parseType" | "resource" | "nodeID" | "datatype" | "li"
            ) {
                return Err(self.error(format!("rdf:{local} cannot be a node element")));
            }
        }
        if attrs.resource.is_some() || attrs.datatype.is_some() || attrs.parse_type.is_some() {
            return Err(self.error(
                "rdf:resource, rdf:datatype and rdf:parseType are not allowed on a node element",
            ));
        }

        let subject = match (attrs.about, attrs.id, attrs.node_id) {
            (Some(about), None, None) => Subject::Iri(self.resolve(&about)),
            (None, Some(id), None) => Subject::Iri(self.id_iri(&id)?),
            (None, None, Some(node_id)) => Subject::BlankNode(self.labeled(&node_id)?),
            (None, None, None) => Subject::BlankNode(self.bnodes.fresh()),
            _ => {
                return Err(self.error("rdf:about, rdf:ID and rdf:nodeID are mutually exclusive"))
            }
        };

        let conflict = match self.frames.last_mut() {
            Some(Frame::Property { object, text, .. }) => {
                if object.is_some() || !is_blank(text) {
                    true
                } else {
                    *object = Some(subject.clone());
                    false
                }
            }
            Some(Frame::Collection { items, .. }) => {
                items.push(subject.clone());
                false
            }
            _ => false,
        };
        if conflict {
            return Err(self.error("a property element may contain only one node or text"));
        }

        if name.as_str() != rdf::DESCRIPTION {
            self.triples
                .push(Triple::new(subject.clone(), Iri::new(rdf::TYPE), name.clone()));
        }
        self.property_attributes(&subject, attrs.rdf_type, attrs.properties);
        self.frames.push(Frame::Node { subject, li: 0 });
        Ok(())
    }

    /// Triples from `rdf:type` and property attributes.
    fn property_attributes(
        &mut self,
        subject: &Subject,
        rdf_type: Option<String>,
        properties: Vec<(Iri, String)>,
    ) {
        if let Some(class) = rdf_type {
            let class = self.resolve(&class);
            self.triples
                .push(Triple::new(subject.clone(), Iri::new(rdf::TYPE), class));
        }
        let lang = self.scope().lang.clone();
        for (predicate, value) in properties {
            let object = self.literal(value, lang.as_deref());
            self.triples.push(Triple::new(subject.clone(), predicate, object));
        }
    }

    fn property_element(
        &mut self,
        name: &Iri,
        subject: Subject,
        predicate: Iri,
        attrs: Attributes,
        empty: bool,
    ) -> Result<()> {
        if let Some(local) = name.as_str().strip_prefix(rdf::NS) {
            if matches!(
                local,
                "Description" | "RDF" | "ID" | "about" | "parseType" | "resource" | "nodeID"
                    | "datatype"
            ) {
                return Err(self.error(format!("rdf:{local} cannot be a property element")));
            }
        }
        if attrs.about.is_some() {
            return Err(self.error("rdf:about is not allowed on a property element"));
        }
        let reify = attrs.id.as_deref().map(|id| self.id_iri(id)).transpose()?;

        if let Some(parse_type) = attrs.parse_type {
            let frame = match parse_type.as_str() {
                "Resource" => {
                    let node = self.bnodes.fresh();
                    self.emit(subject, predicate, node.clone().into(), reify);
                    Frame::Node {
                        subject: Subject::BlankNode(node),
                        li: 0,
                    }
                }
                "Collection" => Frame::Collection {
                    subject,
                    predicate,
                    reify,
                    items: Vec::new(),
                },
                // "Literal" and any other value.
                _ => {
                    if !empty {
                        self.literal_depth = Some(0);
                    }
                    Frame::Literal {
                        subject,
                        predicate,
                        reify,
                        content_start: (!empty).then(|| self.reader.buffer_position()),
                    }
                }
            };
            self.frames.push(frame);
            return Ok(());
        }

        let has_node_attributes = attrs.resource.is_some()
            || attrs.node_id.is_some()
            || attrs.rdf_type.is_some()
            || !attrs.properties.is_empty();
        if has_node_attributes {
            if attrs.datatype.is_some() {
                return Err(self.error("rdf:datatype cannot be combined with a node reference"));
            }
            let object = match (attrs.resource, attrs.node_id) {
                (Some(resource), None) => Subject::Iri(self.resolve(&resource)),
                (None, Some(node_id)) => Subject::BlankNode(self.labeled(&node_id)?),
                (None, None) => Subject::BlankNode(self.bnodes.fresh()),
                (Some(_), Some(_)) => {
                    return Err(self.error("rdf:resource and rdf:nodeID are mutually exclusive"))
                }
            };
            self.emit(subject, predicate, object.clone().into(), reify);
            self.property_attributes(&object, attrs.rdf_type, attrs.properties);
            self.frames.push(Frame::Closed);
            return Ok(());
        }

        let datatype = attrs.datatype.map(|datatype| self.resolve(&datatype));
        let lang = self.scope().lang.clone();
        self.frames.push(Frame::Property {
            subject,
            predicate,
            reify,
            datatype,
            lang,
            text: String::new(),
            object: None,
        });
        Ok(())
    }

    fn end_element(&mut self) -> Result<()> {
        let frame = self.frames.pop();
        match frame {
            Some(Frame::Property {
                subject,
                predicate,
                reify,
                datatype,
                lang,
                text,
                object,
            }) => {
                let object = match (object, datatype) {
                    (Some(node), _) => Term::from(node),
                    (None, Some(datatype)) => Literal::typed(text, datatype).into(),
                    (None, None) => self.literal(text, lang.as_deref()).into(),
                };
                self.emit(subject, predicate, object, reify);
            }
            Some(Frame::Literal {
                subject,
                predicate,
                reify,
                content_start,
            }) => {
                let content = content_start
                    .and_then(|start| self.text.get(start..self.event_start))
                    .unwrap_or_default();
                let object = Literal::typed(content, Iri::new(rdf::XML_LITERAL));
                self.emit(subject, predicate, object.into(), reify);
            }
            Some(Frame::Collection {
                subject,
                predicate,
                reify,
                items,
            }) => {
                let cells: Vec<BlankNode> = items.iter().map(|_| self.bnodes.fresh()).collect();
                for (i, (cell, item)) in cells.iter().zip(items).enumerate() {
                    self.triples
                        .push(Triple::new(cell.clone(), Iri::new(rdf::FIRST), item));
                    let rest: Term = match cells.get(i + 1) {
                        Some(next) => next.clone().into(),
                        None => Iri::new(rdf::NIL).into(),
                    };
                    self.triples
                        .push(Triple::new(cell.clone(), Iri::new(rdf::REST), rest));
                }
                let head: Term = match cells.first() {
                    Some(cell) => cell.clone().into(),
                    None => Iri::new(rdf::NIL).into(),
                };
                self.emit(subject, predicate, head, reify);
            }
            Some(Frame::Root | Frame::Node { .. } | Frame::Closed) => {}
            None => return Err(self.error("unbalanced end tag")),
        }
        self.scopes.pop();
        Ok(())
    }

    fn text(&mut self, content: &str) -> Result<()> {
        let blank = is_blank(content);
        let misplaced = match self.frames.last_mut() {
            Some(Frame::Property { text, object, .. }) => {
                if object.is_some() && !blank {
                    true
                } else {
                    text.push_str(content);
                    false
                }
            }
            _ => !blank,
        };
        if misplaced {
            return Err(self.error("unexpected text content"));
        }
        Ok(())
    }

    /// Emits a statement, reifying it when the property element has an
    /// `rdf:ID`.
    fn emit(&mut self, subject: Subject, predicate: Iri, object: Term, reify: Option<Iri>) {
        if let Some(statement) = reify {
            self.triples.push(Triple::new(
                subject.clone(),
                predicate.clone(),
                object.clone(),
            ));
            self.triples.push(Triple::new(
                statement.clone(),
                Iri::new(rdf::TYPE),
                Iri::new(rdf::STATEMENT),
            ));
            self.triples
                .push(Triple::new(statement.clone(), Iri::new(rdf::SUBJECT), subject));
            self.triples
                .push(Triple::new(statement.clone(), Iri::new(rdf::PREDICATE), predicate));
            self.triples
                .push(Triple::new(statement, Iri::new(rdf::OBJECT), object));
        } else {
            self.triples.push(Triple::new(subject, predicate, object));
        }
    }
}

/// `xmlns`, `xmlns:*` and `xml:*`; other names merely starting with `xml`
/// are ordinary attributes.
fn is_xml_attribute(key: &str) -> bool {
    key == "xmlns" || key.starts_with("xmlns:") || key.starts_with("xml:")
}

/// Looks up the predefined XML entities, then the document's declarations.
fn resolve_entity<'e>(entities: &'e [(String, String)], name: &str) -> Option<&'e str> {
    match name {
        "lt" => Some("<"),
        "gt" => Some(">"),
        "amp" => Some("&"),
        "apos" => Some("'"),
        "quot" => Some("\""),
        _ => entities
            .iter()
            .find(|(declared, _)| declared == name)
            .map(|(_, value)| value.as_str()),
    }
}

/// Internal general entities of a DOCTYPE, e.g.
/// `rdf:RDF [ <!ENTITY ex "http://example.org/"> ]`, in declaration order.
///
/// Parameter entities and external entities are skipped. References to
/// entities declared earlier are expanded in the replacement text.
fn entity_declarations(doctype: &str) -> Vec<(String, String)> {
    let mut entities: Vec<(String, String)> = Vec::new();
    let mut rest = doctype;
    while let Some(start) = rest.find("<!ENTITY") {
        rest = rest[start + "<!ENTITY".len()..].trim_start();
        if let Some(parameter) = rest.strip_prefix('%') {
            rest = parameter;
            continue;
        }
        let name_end = rest
            .find(|c: char| c.is_whitespace())
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        let Some(quote) = rest.chars().next().filter(|c| matches!(c, '"' | '\'')) else {
            continue;
        };
        let Some(end) = rest[1..].find(quote) else {
            break;
        };
        let raw = &rest[1..=end];
        rest = &rest[end + 2..];

        let value = quick_xml::escape::unescape_with(raw, |n| resolve_entity(&entities, n))
            .map_or_else(|_| raw.to_owned(), std::borrow::Cow::into_owned);
        if !name.is_empty() && entities.iter().all(|(declared, _)| declared != name) {
            entities.push((name.to_owned(), value));
        }
    }
    entities
}

fn is_blank(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Position;

    const BASE: &str = "http://example.org/base/doc";

    fn parse(text: &str) -> Vec<Result<Triple>> {
        RdfXmlParser
            .parse(Box::new(text.as_bytes()), &Iri::new(BASE))
            .collect()
    }

    fn triples(text: &str) -> Vec<Triple> {
        parse(text)
            .into_iter()
            .map(std::result::Result::unwrap)
            .collect()
    }

    fn doc(body: &str) -> String {
        format!(
            "<?xml version=\"1.0\"?>\n\
             <rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\"\n\
                      xmlns:ex=\"http://example.org/ns#\">\n{body}\n</rdf:RDF>"
        )
    }

    fn iri(value: &str) -> Iri {
        Iri::new(value)
    }

    #[test]
    fn descriptions_and_property_forms() {
        let parsed = triples(&doc(
            r#"<rdf:Description rdf:about="http://example.org/s" ex:attr="a">
                 <ex:name xml:lang="IT">ciao</ex:name>
                 <ex:link rdf:resource="other"/>
                 <ex:count rdf:datatype="http://www.w3.org/2001/XMLSchema#integer">3</ex:count>
                 <ex:empty/>
               </rdf:Description>"#,
        ));
        let subject = Subject::Iri(iri("http://example.org/s"));
        assert!(parsed.iter().all(|t| t.subject == subject));
        assert_eq!(parsed.len(), 5);
        assert_eq!(parsed[0].object, Term::Literal(Literal::simple("a")));
        let name = parsed[1].object.as_literal().unwrap();
        assert_eq!(name.language().unwrap().as_str(), "it");
        assert_eq!(parsed[2].object, Term::Iri(iri("http://example.org/base/other")));
        let count = parsed[3].object.as_literal().unwrap();
        assert_eq!(count.datatype().as_str(), "http://www.w3.org/2001/XMLSchema#integer");
        assert_eq!(parsed[4].object, Term::Literal(Literal::simple("")));
    }

    #[test]
    fn typed_nodes_and_nesting() {
        let parsed = triples(&doc(
            r#"<ex:Person rdf:ID="alice">
                 <ex:knows>
                   <ex:Person rdf:nodeID="bob"/>
                 </ex:knows>
               </ex:Person>"#,
        ));
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].subject, Subject::Iri(iri("http://example.org/base/doc#alice")));
        assert_eq!(parsed[0].object, Term::Iri(iri("http://example.org/ns#Person")));
        let bob = parsed[1].subject.as_blank_node().unwrap();
        assert_eq!(parsed[2].object.as_blank_node(), Some(bob));
    }

    #[test]
    fn parse_types() {
        let parsed = triples(&doc(
            r#"<rdf:Description rdf:about="http://example.org/s">
                 <ex:xml rdf:parseType="Literal"><b>bold</b> text</ex:xml>
                 <ex:res rdf:parseType="Resource"><ex:v>1</ex:v></ex:res>
                 <ex:list rdf:parseType="Collection">
                   <rdf:Description rdf:about="http://example.org/a"/>
                   <rdf:Description rdf:about="http://example.org/b"/>
                 </ex:list>
               </rdf:Description>"#,
        ));
        let xml = parsed[0].object.as_literal().unwrap();
        assert_eq!(xml.datatype().as_str(), rdf::XML_LITERAL);
        assert_eq!(xml.lexical_form(), "<b>bold</b> text");

        assert_eq!(parsed[1].predicate, iri("http://example.org/ns#res"));
        let node = parsed[1].object.as_blank_node().unwrap();
        assert_eq!(parsed[2].subject.as_blank_node(), Some(node));

        // four list triples, then the head
        assert_eq!(parsed[3].predicate, iri(rdf::FIRST));
        assert_eq!(parsed[3].object, Term::Iri(iri("http://example.org/a")));
        assert_eq!(parsed[6].object, Term::Iri(iri(rdf::NIL)));
        assert_eq!(parsed[7].predicate, iri("http://example.org/ns#list"));
        assert_eq!(parsed[7].object.as_blank_node(), parsed[3].subject.as_blank_node());
    }

    #[test]
    fn li_numbering_and_reification() {
        let parsed = triples(&doc(
            r#"<rdf:Description rdf:about="http://example.org/bag">
                 <rdf:li>one</rdf:li>
                 <rdf:li rdf:ID="st">two</rdf:li>
               </rdf:Description>"#,
        ));
        assert_eq!(parsed[0].predicate, iri(&format!("{}_1", rdf::NS)));
        assert_eq!(parsed[1].predicate, iri(&format!("{}_2", rdf::NS)));
        assert_eq!(parsed.len(), 6);
        let statement = Subject::Iri(iri("http://example.org/base/doc#st"));
        assert_eq!(parsed[2].subject, statement);
        assert_eq!(parsed[2].object, Term::Iri(iri(rdf::STATEMENT)));
    }

    #[test]
    fn xml_base_scopes() {
        let parsed = triples(&doc(
            r#"<rdf:Description rdf:about="a" xml:base="http://other.org/dir/">
                 <ex:p rdf:resource="b"/>
               </rdf:Description>
               <rdf:Description rdf:about="c"/>"#,
        ));
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].subject, Subject::Iri(iri("http://other.org/dir/a")));
        assert_eq!(parsed[0].object, Term::Iri(iri("http://other.org/dir/b")));
    }

    #[test]
    fn document_element_is_optional() {
        let parsed = triples(
            r#"<ex:Thing xmlns:ex="http://example.org/ns#" rdf:about="http://example.org/t"
                 xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"/>"#,
        );
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].predicate, iri(rdf::TYPE));
    }

    #[test]
    fn errors_keep_earlier_triples() {
        let results = parse(&doc(
            r#"<rdf:Description rdf:about="http://example.org/s">
                 <ex:ok>1</ex:ok>
               </rdf:Description>
               <rdf:Description rdf:about="http://example.org/s">
                 <undeclared:p>2</undeclared:p>
               </rdf:Description>"#,
        ));
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        match &results[1] {
            Err(ParseError::Syntax(err)) => {
                assert!(err.message.contains("undeclared"));
                assert!(matches!(err.position, Position::Text { line: 8, .. }));
            }
            other => unreachable!("expected a syntax error, got {other:?}"),
        }
    }

    #[test]
    fn doctype_entities_expand_in_attributes_and_text() {
        let parsed = triples(
            r#"<?xml version="1.0"?>
<!DOCTYPE rdf:RDF [
  <!ENTITY % skipped "ignored">
  <!ENTITY ex "http://example.org/ns#">
  <!ENTITY thing "&ex;thing">
  <!ENTITY ex "http://example.org/redeclared#">
]>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:ex="http://example.org/ns#">
  <rdf:Description rdf:about="&ex;s">
    <ex:link rdf:resource="&thing;"/>
    <ex:label>a &amp; &ex;b</ex:label>
  </rdf:Description>
</rdf:RDF>"#,
        );
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].subject, Subject::Iri(iri("http://example.org/ns#s")));
        assert_eq!(parsed[0].object, Term::Iri(iri("http://example.org/ns#thing")));
        assert_eq!(
            parsed[1].object,
            Term::Literal(Literal::simple("a & http://example.org/ns#b"))
        );
    }

    #[test]
    fn undeclared_entities_are_rejected() {
        let results = parse(&doc(r#"<rdf:Description rdf:about="&nope;s"/>"#));
        assert!(matches!(results.last(), Some(Err(ParseError::Syntax(_)))));
    }

    #[test]
    fn only_xml_prefixed_names_are_reserved() {
        let parsed = triples(
            r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
                        xmlns:xmlfoo="http://example.org/foo#">
                 <rdf:Description rdf:about="http://example.org/s" xmlfoo:p="v" xml:lang="en"/>
               </rdf:RDF>"#,
        );
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].predicate, iri("http://example.org/foo#p"));
        let literal = parsed[0].object.as_literal().unwrap();
        assert_eq!(literal.language().unwrap().as_str(), "en");
    }

    #[test]
    fn malformed_xml_is_a_syntax_error() {
        let results = parse(&doc("<rdf:Description rdf:about=\"x\"></ex:wrong>"));
        assert!(matches!(results.last(), Some(Err(ParseError::Syntax(_)))));
    }

    #[test]
    fn text_beside_a_node_is_rejected() {
        let results = parse(&doc(
            r#"<rdf:Description rdf:about="http://example.org/s">
                 <ex:p>text<rdf:Description/></ex:p>
               </rdf:Description>"#,
        ));
        assert!(matches!(results.last(), Some(Err(ParseError::Syntax(_)))));
    }
}
