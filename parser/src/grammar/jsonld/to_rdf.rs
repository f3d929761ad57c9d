//! Expansion of JSON-LD node objects straight into triples.

use serde_json::{Map, Number, Value};

use super::context::{Container, Context, ContextError, TermDefinition, TypeMapping};
use crate::error::{ParseError, Position, SyntaxError};
use crate::grammar::BlankNodeAllocator;
use crate::iri;
use crate::model::{Iri, Language, Literal, Subject, Term, Triple};
use crate::vocab::{rdf, xsd};

type Result<T> = std::result::Result<T, ParseError>;

/// Walks a JSON-LD document, collecting triples in document order.
///
/// The JSON pointer of the value being converted is kept in `path` so
/// structural errors can name their location.
pub(super) struct Converter {
    bnodes: BlankNodeAllocator,
    triples: Vec<Triple>,
    path: Vec<String>,
}

impl Converter {
    pub(super) fn new() -> Self {
        Self {
            bnodes: BlankNodeAllocator::new(),
            triples: Vec::new(),
            path: Vec::new(),
        }
    }

    pub(super) fn into_triples(self) -> Vec<Triple> {
        self.triples
    }

    pub(super) fn document(&mut self, document: &Value, context: &Context) -> Result<()> {
        match document {
            Value::Array(items) => self.graph(items, context),
            Value::Object(_) => self.node(document, context, true).map(drop),
            _ => Err(self.fail("a JSON-LD document must be an object or an array")),
        }
    }

    // Errors and paths

    fn within<T>(
        &mut self,
        segment: impl ToString,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.path.push(segment.to_string());
        let result = f(self);
        self.path.pop();
        result
    }

    fn pointer(&self) -> String {
        self.path
            .iter()
            .map(|segment| format!("/{}", segment.replace('~', "~0").replace('/', "~1")))
            .collect()
    }

    fn fail(&self, message: impl Into<String>) -> ParseError {
        SyntaxError::new(Position::Path(self.pointer()), message).into()
    }

    fn context_error(&self, err: ContextError) -> ParseError {
        let mut pointer = self.pointer();
        if let Some(term) = err.term {
            pointer.push('/');
            pointer.push_str(&term.replace('~', "~0").replace('/', "~1"));
        }
        SyntaxError::new(Position::Path(pointer), err.message).into()
    }

    fn scoped(&mut self, context: &Context, local: &Value) -> Result<Context> {
        self.within("@context", |this| {
            context.process(local).map_err(|err| this.context_error(err))
        })
    }

    // Nodes

    fn graph(&mut self, items: &[Value], context: &Context) -> Result<()> {
        for (i, item) in items.iter().enumerate() {
            self.within(i, |this| this.node(item, context, true))?;
        }
        Ok(())
    }

    /// Converts a node object, returning its subject.
    ///
    /// At the top level free-floating values are dropped and a node holding
    /// only `@graph` (and `@context`) contributes its members to the default
    /// graph.
    fn node(&mut self, value: &Value, context: &Context, top: bool) -> Result<Option<Subject>> {
        let Value::Object(map) = value else {
            if top {
                return Ok(None);
            }
            return Err(self.fail("expected a node object"));
        };

        let scoped;
        let context = match map.get("@context") {
            Some(local) => {
                scoped = self.scoped(context, local)?;
                &scoped
            }
            None => context,
        };

        let entries: Vec<(&String, String, &Value)> = map
            .iter()
            .filter_map(|(key, value)| {
                context
                    .expand_iri(key, false, true)
                    .map(|expanded| (key, expanded, value))
            })
            .collect();

        if entries
            .iter()
            .any(|(_, expanded, _)| matches!(expanded.as_str(), "@value" | "@list" | "@set"))
        {
            if top {
                return Ok(None);
            }
            return Err(self.fail("expected a node object"));
        }

        if let Some(&(key, _, items)) = entries.iter().find(|(_, expanded, _)| expanded == "@graph") {
            let named = entries
                .iter()
                .any(|(_, expanded, _)| !matches!(expanded.as_str(), "@graph" | "@context"));
            if !top || named {
                return self.within(key, |this| {
                    Err(this.fail("a named graph cannot be represented as triples"))
                });
            }
            let items = match items {
                Value::Array(items) => items.as_slice(),
                other => std::slice::from_ref(other),
            };
            self.within(key, |this| this.graph(items, context))?;
            return Ok(None);
        }

        let subject = match entries.iter().find(|(_, expanded, _)| expanded == "@id") {
            Some(&(key, _, Value::String(id))) => self.within(key, |this| {
                let reference = context.expand_iri(id, true, false).unwrap_or_default();
                this.reference(&reference)
            })?,
            Some(&(key, _, _)) => {
                return self.within(key, |this| Err(this.fail("@id must be a string")))
            }
            None => Subject::BlankNode(self.bnodes.fresh()),
        };

        for (key, expanded, value) in &entries {
            self.within(key, |this| match expanded.as_str() {
                "@id" | "@context" | "@index" => Ok(()),
                "@type" => this.types(&subject, value, context),
                "@reverse" => this.reverse_map(&subject, value, context),
                "@language" | "@direction" | "@json" => Err(this.fail(format!(
                    "{expanded} is not allowed in a node object"
                ))),
                "@included" | "@nest" => Err(this.fail(format!("{expanded} is not supported"))),
                keyword if keyword.starts_with('@') => Ok(()),
                predicate => this.property(&subject, key, predicate, value, context),
            })?;
        }

        Ok(Some(subject))
    }

    /// An expanded `@id`, `@type` or `@id`-coerced value.
    fn reference(&mut self, expanded: &str) -> Result<Subject> {
        if let Some(label) = expanded.strip_prefix("_:") {
            return Ok(Subject::BlankNode(self.bnodes.labeled(label)));
        }
        if iri::is_absolute(expanded) {
            return Ok(Subject::Iri(Iri::new(expanded)));
        }
        Err(self.fail(format!("'{expanded}' does not expand to an absolute IRI")))
    }

    fn types(&mut self, subject: &Subject, value: &Value, context: &Context) -> Result<()> {
        let types = match value {
            Value::Array(types) => types.as_slice(),
            other => std::slice::from_ref(other),
        };
        for (i, kind) in types.iter().enumerate() {
            let Value::String(kind) = kind else {
                return self.within(i, |this| Err(this.fail("@type values must be strings")));
            };
            let expanded = context.expand_iri(kind, true, true).unwrap_or_default();
            let class = self.reference(&expanded)?;
            self.triples
                .push(Triple::new(subject.clone(), Iri::new(rdf::TYPE), class));
        }
        Ok(())
    }

    fn reverse_map(&mut self, subject: &Subject, value: &Value, context: &Context) -> Result<()> {
        let Value::Object(map) = value else {
            return Err(self.fail("@reverse must be an object"));
        };
        for (key, values) in map {
            let Some(predicate) = context.expand_iri(key, false, true) else {
                continue;
            };
            if !iri::is_absolute(&predicate) || predicate.starts_with("_:") {
                continue;
            }
            let definition = context.term(key);
            let forward = definition.is_some_and(|d| d.reverse);
            self.within(key, |this| {
                let objects = this.values(values, definition, context)?;
                this.link(subject, Iri::new(predicate), objects, !forward)
            })?;
        }
        Ok(())
    }

    fn property(
        &mut self,
        subject: &Subject,
        key: &str,
        predicate: &str,
        value: &Value,
        context: &Context,
    ) -> Result<()> {
        // Keys that do not expand to an absolute IRI carry no triple.
        if !iri::is_absolute(predicate) || predicate.starts_with("_:") {
            return Ok(());
        }
        let definition = context.term(key);
        let scoped;
        let context = match definition.and_then(|d| d.context.as_ref()) {
            Some(local) => {
                scoped = self.scoped(context, local)?;
                &scoped
            }
            None => context,
        };
        let reverse = definition.is_some_and(|d| d.reverse);
        let objects = self.values(value, definition, context)?;
        self.link(subject, Iri::new(predicate), objects, reverse)
    }

    fn link(
        &mut self,
        subject: &Subject,
        predicate: Iri,
        objects: Vec<Term>,
        reverse: bool,
    ) -> Result<()> {
        for object in objects {
            let triple = if reverse {
                let node = match object {
                    Term::Iri(iri) => Subject::Iri(iri),
                    Term::BlankNode(node) => Subject::BlankNode(node),
                    Term::Literal(_) => {
                        return Err(self.fail("the value of a reverse property must be a node"))
                    }
                };
                Triple::new(node, predicate.clone(), subject.clone())
            } else {
                Triple::new(subject.clone(), predicate.clone(), object)
            };
            self.triples.push(triple);
        }
        Ok(())
    }

    // Values

    /// Converts the value of a property into its objects.
    fn values(
        &mut self,
        value: &Value,
        definition: Option<&TermDefinition>,
        context: &Context,
    ) -> Result<Vec<Term>> {
        let Some(definition) = definition else {
            return self.plain_values(value, None, context);
        };
        if definition.type_mapping == Some(TypeMapping::Json) {
            return Ok(vec![json_literal(value).into()]);
        }
        match (definition.container, value) {
            (Container::List, Value::Object(map)) if has_keyword(map, context, "@list") => {
                self.plain_values(value, Some(definition), context)
            }
            (Container::List, Value::Null) => Ok(Vec::new()),
            (Container::List, _) => Ok(vec![self.list(value, Some(definition), context)?]),
            (Container::Language, Value::Object(map)) => self.language_map(map, context),
            (Container::Index, Value::Object(map)) if !is_value_or_node(map, context) => {
                let mut objects = Vec::new();
                for (index, item) in map {
                    objects.extend(
                        self.within(index, |this| this.plain_values(item, Some(definition), context))?,
                    );
                }
                Ok(objects)
            }
            _ => self.plain_values(value, Some(definition), context),
        }
    }

    /// Conversion without container handling: arrays and `@set` flatten.
    fn plain_values(
        &mut self,
        value: &Value,
        definition: Option<&TermDefinition>,
        context: &Context,
    ) -> Result<Vec<Term>> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => {
                let mut objects = Vec::new();
                for (i, item) in items.iter().enumerate() {
                    objects.extend(self.within(i, |this| this.plain_values(item, definition, context))?);
                }
                Ok(objects)
            }
            Value::Object(map) => {
                if has_keyword(map, context, "@value") {
                    return Ok(self.value_object(map, context)?.into_iter().collect());
                }
                if let Some((key, items)) = keyword_entry(map, context, "@list") {
                    let list = self.within(key, |this| this.list(items, definition, context))?;
                    return Ok(vec![list]);
                }
                if let Some((key, items)) = keyword_entry(map, context, "@set") {
                    return self.within(key, |this| this.plain_values(items, definition, context));
                }
                let node = self.node(value, context, false)?;
                Ok(node.map(Term::from).into_iter().collect())
            }
            scalar => Ok(vec![self.scalar(scalar, definition, context)?]),
        }
    }

    fn list(
        &mut self,
        items: &Value,
        definition: Option<&TermDefinition>,
        context: &Context,
    ) -> Result<Term> {
        let items = match items {
            Value::Array(items) => items.as_slice(),
            Value::Null => &[],
            other => std::slice::from_ref(other),
        };
        let mut members = Vec::new();
        for (i, item) in items.iter().enumerate() {
            let converted = self.within(i, |this| match item {
                Value::Array(_) => this.list(item, definition, context).map(|list| vec![list]),
                _ => this.plain_values(item, definition, context),
            })?;
            members.extend(converted);
        }

        let cells: Vec<_> = members.iter().map(|_| self.bnodes.fresh()).collect();
        for (i, (cell, member)) in cells.iter().zip(members).enumerate() {
            self.triples
                .push(Triple::new(cell.clone(), Iri::new(rdf::FIRST), member));
            let rest: Term = match cells.get(i + 1) {
                Some(next) => next.clone().into(),
                None => Iri::new(rdf::NIL).into(),
            };
            self.triples
                .push(Triple::new(cell.clone(), Iri::new(rdf::REST), rest));
        }
        Ok(match cells.into_iter().next() {
            Some(head) => head.into(),
            None => Iri::new(rdf::NIL).into(),
        })
    }

    fn language_map(&mut self, map: &Map<String, Value>, context: &Context) -> Result<Vec<Term>> {
        let mut objects = Vec::new();
        for (tag, values) in map {
            let none = tag == "@none" || context.expand_iri(tag, false, true).as_deref() == Some("@none");
            let values = match values {
                Value::Array(values) => values.as_slice(),
                other => std::slice::from_ref(other),
            };
            for value in values {
                match value {
                    Value::Null => {}
                    Value::String(text) if none => objects.push(Literal::simple(text.as_str()).into()),
                    Value::String(text) => objects
                        .push(Literal::language_tagged(text.as_str(), Language::new(tag)).into()),
                    _ => {
                        return self.within(tag, |this| {
                            Err(this.fail("language map values must be strings"))
                        })
                    }
                }
            }
        }
        Ok(objects)
    }

    fn value_object(&mut self, map: &Map<String, Value>, context: &Context) -> Result<Option<Term>> {
        let mut value = &Value::Null;
        let mut datatype = None;
        let mut language = None;
        let mut json = false;

        for (key, entry) in map {
            match context.expand_iri(key, false, true).as_deref() {
                Some("@value") => value = entry,
                Some("@type") => match entry {
                    Value::String(kind) => {
                        let expanded = context.expand_iri(kind, true, true).unwrap_or_default();
                        if expanded == "@json" {
                            json = true;
                        } else if iri::is_absolute(&expanded) && !expanded.starts_with("_:") {
                            datatype = Some(Iri::new(expanded));
                        } else {
                            return self.within(key, |this| {
                                Err(this.fail(format!("invalid datatype '{kind}'")))
                            });
                        }
                    }
                    _ => {
                        return self.within(key, |this| {
                            Err(this.fail("@type in a value object must be a string"))
                        })
                    }
                },
                Some("@language") => match entry {
                    Value::String(tag) => language = Some(Language::new(tag)),
                    _ => {
                        return self.within(key, |this| Err(this.fail("@language must be a string")))
                    }
                },
                Some("@direction" | "@index" | "@context") => {}
                _ => {
                    return self.within(key, |this| {
                        Err(this.fail(format!("'{key}' is not allowed in a value object")))
                    })
                }
            }
        }

        if json {
            return Ok(Some(json_literal(value).into()));
        }
        if datatype.is_some() && language.is_some() {
            return Err(self.fail("a value object cannot have both @type and @language"));
        }
        let literal = match value {
            Value::Null => return Ok(None),
            Value::String(text) => match (datatype, language) {
                (Some(datatype), _) => Literal::typed(text.as_str(), datatype),
                (None, Some(language)) => Literal::language_tagged(text.as_str(), language),
                (None, None) => Literal::simple(text.as_str()),
            },
            Value::Bool(_) | Value::Number(_) if language.is_some() => {
                return Err(self.fail("@language requires a string @value"));
            }
            Value::Bool(flag) => native_boolean(*flag, datatype),
            Value::Number(number) => native_number(number, datatype),
            _ => return Err(self.fail("@value must be a string, number, boolean or null")),
        };
        Ok(Some(literal.into()))
    }

    /// A string, number or boolean outside a value object.
    fn scalar(
        &mut self,
        value: &Value,
        definition: Option<&TermDefinition>,
        context: &Context,
    ) -> Result<Term> {
        let mapping = definition.and_then(|d| d.type_mapping.as_ref());
        let datatype = match mapping {
            Some(TypeMapping::Datatype(datatype)) => Some(Iri::new(datatype.as_str())),
            _ => None,
        };
        match value {
            Value::String(text) => match mapping {
                Some(TypeMapping::Id) => {
                    let expanded = context.expand_iri(text, true, false).unwrap_or_default();
                    self.reference(&expanded).map(Term::from)
                }
                Some(TypeMapping::Vocab) => {
                    let expanded = context.expand_iri(text, true, true).unwrap_or_default();
                    self.reference(&expanded).map(Term::from)
                }
                _ => {
                    if let Some(datatype) = datatype {
                        return Ok(Literal::typed(text.as_str(), datatype).into());
                    }
                    let language = match definition.and_then(|d| d.language.as_ref()) {
                        Some(language) => language.as_deref(),
                        None => context.language.as_deref(),
                    };
                    Ok(match language {
                        Some(tag) => Literal::language_tagged(text.as_str(), Language::new(tag)),
                        None => Literal::simple(text.as_str()),
                    }
                    .into())
                }
            },
            Value::Bool(flag) => Ok(native_boolean(*flag, datatype).into()),
            Value::Number(number) => Ok(native_number(number, datatype).into()),
            _ => Err(self.fail("expected a string, number or boolean")),
        }
    }
}

/// The entry of `map` whose key expands to `keyword`.
fn keyword_entry<'m>(
    map: &'m Map<String, Value>,
    context: &Context,
    keyword: &str,
) -> Option<(&'m String, &'m Value)> {
    map.iter()
        .find(|(key, _)| context.expand_iri(key, false, true).as_deref() == Some(keyword))
}

fn has_keyword(map: &Map<String, Value>, context: &Context, keyword: &str) -> bool {
    keyword_entry(map, context, keyword).is_some()
}

/// True if the object under an `@index` container is itself a value or a
/// node rather than an index map.
fn is_value_or_node(map: &Map<String, Value>, context: &Context) -> bool {
    ["@value", "@id", "@list", "@set"]
        .iter()
        .any(|keyword| has_keyword(map, context, keyword))
}

fn native_boolean(flag: bool, datatype: Option<Iri>) -> Literal {
    Literal::typed(
        flag.to_string(),
        datatype.unwrap_or_else(|| Iri::new(xsd::BOOLEAN)),
    )
}

/// Integral numbers below 10^21 keep the integer form; everything else uses
/// the canonical `xsd:double` form.
fn native_number(number: &Number, datatype: Option<Iri>) -> Literal {
    let as_double = datatype.as_ref().is_some_and(|d| d.as_str() == xsd::DOUBLE);
    let (lexical, default) = if let (Some(i), false) = (number.as_i64(), as_double) {
        (i.to_string(), xsd::INTEGER)
    } else if let (Some(u), false) = (number.as_u64(), as_double) {
        (u.to_string(), xsd::INTEGER)
    } else {
        match number.as_f64() {
            Some(f) if !as_double && f.fract() == 0.0 && f.abs() < 1e21 => {
                (format!("{f:.0}"), xsd::INTEGER)
            }
            Some(f) => (canonical_double(f), xsd::DOUBLE),
            None => (number.to_string(), xsd::DOUBLE),
        }
    };
    Literal::typed(lexical, datatype.unwrap_or_else(|| Iri::new(default)))
}

/// `1.5E0`, `1.0E21`: one digit before the point, at least one after.
fn canonical_double(value: f64) -> String {
    let formatted = format!("{value:E}");
    match formatted.split_once('E') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{mantissa}.0E{exponent}")
        }
        _ => formatted,
    }
}

/// JSON literals are serialized with object keys sorted.
fn json_literal(value: &Value) -> Literal {
    Literal::typed(sorted_keys(value).to_string(), Iri::new(rdf::JSON))
}

fn sorted_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, entry)| (key.clone(), sorted_keys(entry)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted_keys).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_literals_sort_object_keys() {
        let value: Value = serde_json::from_str(r#"{"b": [{"z": 1, "y": 2}], "a": null}"#).unwrap_or_default();
        assert_eq!(
            json_literal(&value).lexical_form(),
            r#"{"a":null,"b":[{"y":2,"z":1}]}"#
        );
    }

    #[test]
    fn doubles_use_the_canonical_form() {
        assert_eq!(canonical_double(1.5), "1.5E0");
        assert_eq!(canonical_double(1e21), "1.0E21");
        assert_eq!(canonical_double(-0.25), "-2.5E-1");
    }

    #[test]
    fn integral_numbers_stay_integers() {
        let five = native_number(&Number::from(5), None);
        assert_eq!(five.lexical_form(), "5");
        assert_eq!(five.datatype().as_str(), xsd::INTEGER);

        let whole = Number::from_f64(5.0).map(|n| native_number(&n, None));
        assert_eq!(whole.as_ref().map(Literal::lexical_form), Some("5"));

        let forced = native_number(&Number::from(5), Some(Iri::new(xsd::DOUBLE)));
        assert_eq!(forced.lexical_form(), "5.0E0");
    }
}
