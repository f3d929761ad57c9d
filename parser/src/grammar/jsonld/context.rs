//! Active contexts and term definitions.
//!
//! Only local contexts are processed: a string entry in `@context` names a
//! remote document and is rejected.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::iri;

/// A context processing failure, optionally naming the term being defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ContextError {
    pub(super) term: Option<String>,
    pub(super) message: String,
}

fn invalid(message: impl Into<String>) -> ContextError {
    ContextError {
        term: None,
        message: message.into(),
    }
}

type Result<T> = std::result::Result<T, ContextError>;

/// Coercion applied to the values of a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum TypeMapping {
    /// `@id`: strings are IRIs, resolved against the base.
    Id,
    /// `@vocab`: strings are terms or IRIs, resolved against the vocabulary.
    Vocab,
    /// `@json`: the value is a JSON literal.
    Json,
    /// `@none`
    None,
    /// Strings and numbers become literals of this datatype.
    Datatype(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) enum Container {
    #[default]
    None,
    List,
    Set,
    Language,
    Index,
}

#[derive(Debug, Clone, Default)]
pub(super) struct TermDefinition {
    /// `None` for a term explicitly mapped to `null`.
    pub(super) iri: Option<String>,
    pub(super) reverse: bool,
    pub(super) type_mapping: Option<TypeMapping>,
    /// `Some(None)` when the term resets the default language.
    pub(super) language: Option<Option<String>>,
    pub(super) container: Container,
    /// Property-scoped context, processed when the term is used.
    pub(super) context: Option<Value>,
}

#[derive(Debug, Clone)]
pub(super) struct Context {
    document_base: String,
    pub(super) base: Option<String>,
    pub(super) vocab: Option<String>,
    pub(super) language: Option<String>,
    terms: HashMap<String, TermDefinition>,
}

const KEYWORDS: &[&str] = &[
    "@base",
    "@container",
    "@context",
    "@direction",
    "@graph",
    "@id",
    "@import",
    "@included",
    "@index",
    "@json",
    "@language",
    "@list",
    "@nest",
    "@none",
    "@prefix",
    "@propagate",
    "@protected",
    "@reverse",
    "@set",
    "@type",
    "@value",
    "@version",
    "@vocab",
];

pub(super) fn is_keyword(value: &str) -> bool {
    KEYWORDS.contains(&value)
}

/// `@` followed by letters only; reserved for future keywords and ignored.
fn looks_like_keyword(value: &str) -> bool {
    value
        .strip_prefix('@')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphabetic()))
}

impl Context {
    /// The initial context of a document parsed against `base`.
    pub(super) fn new(base: &str) -> Self {
        Self {
            document_base: base.to_owned(),
            base: Some(base.to_owned()),
            vocab: None,
            language: None,
            terms: HashMap::new(),
        }
    }

    pub(super) fn term(&self, key: &str) -> Option<&TermDefinition> {
        self.terms.get(key)
    }

    /// Applies a local context (object, array or `null`) on top of this one.
    pub(super) fn process(&self, local: &Value) -> Result<Context> {
        let mut result = self.clone();
        let entries = match local {
            Value::Array(entries) => entries.as_slice(),
            other => std::slice::from_ref(other),
        };
        for entry in entries {
            result = match entry {
                Value::Null => Context::new(&result.document_base),
                Value::String(reference) => {
                    return Err(invalid(format!(
                        "remote context <{reference}> cannot be loaded"
                    )))
                }
                Value::Object(definitions) => result.merge(definitions)?,
                _ => return Err(invalid("@context must be an object, an array or null")),
            };
        }
        Ok(result)
    }

    fn merge(mut self, local: &Map<String, Value>) -> Result<Context> {
        if let Some(version) = local.get("@version") {
            if version.as_f64() != Some(1.1) {
                return Err(invalid("@version must be 1.1"));
            }
        }
        if local.contains_key("@import") {
            return Err(invalid("@import is not supported"));
        }

        if let Some(base) = local.get("@base") {
            self.base = match base {
                Value::Null => None,
                Value::String(reference) if iri::is_absolute(reference) => Some(reference.clone()),
                Value::String(reference) => match &self.base {
                    Some(current) => Some(iri::resolve(current, reference)),
                    None => {
                        return Err(invalid(format!(
                            "relative @base <{reference}> has nothing to resolve against"
                        )))
                    }
                },
                _ => return Err(invalid("@base must be a string or null")),
            };
        }

        if let Some(vocab) = local.get("@vocab") {
            self.vocab = match vocab {
                Value::Null => None,
                Value::String(value) => match self.expand_iri(value, true, true) {
                    Some(expanded) if !is_keyword(&expanded) => Some(expanded),
                    _ => return Err(invalid(format!("invalid @vocab '{value}'"))),
                },
                _ => return Err(invalid("@vocab must be a string or null")),
            };
        }

        if let Some(language) = local.get("@language") {
            self.language = match language {
                Value::Null => None,
                Value::String(tag) => Some(tag.to_ascii_lowercase()),
                _ => return Err(invalid("@language must be a string or null")),
            };
        }

        if let Some(direction) = local.get("@direction") {
            check_direction(direction)?;
        }
        for flag in ["@propagate", "@protected"] {
            if local.get(flag).is_some_and(|value| !value.is_boolean()) {
                return Err(invalid(format!("{flag} must be a boolean")));
            }
        }

        let mut defined = HashMap::new();
        for term in local.keys() {
            if matches!(
                term.as_str(),
                "@base" | "@direction" | "@import" | "@language" | "@propagate" | "@protected"
                    | "@version" | "@vocab"
            ) {
                continue;
            }
            self.define(local, term, &mut defined)?;
        }
        Ok(self)
    }

    /// Creates the definition of `term` from `local`, defining the terms it
    /// depends on first. `defined` maps terms to `true` once done and to
    /// `false` while in progress.
    fn define(
        &mut self,
        local: &Map<String, Value>,
        term: &str,
        defined: &mut HashMap<String, bool>,
    ) -> Result<()> {
        match defined.get(term) {
            Some(true) => return Ok(()),
            Some(false) => return Err(invalid(format!("cyclic IRI mapping for '{term}'"))),
            None => {}
        }
        defined.insert(term.to_owned(), false);

        let value = local.get(term).unwrap_or(&Value::Null);
        let definition = self
            .definition(local, term, value, defined)
            .map_err(|mut err| {
                err.term.get_or_insert_with(|| term.to_owned());
                err
            })?;
        if let Some(definition) = definition {
            self.terms.insert(term.to_owned(), definition);
        }
        defined.insert(term.to_owned(), true);
        Ok(())
    }

    fn definition(
        &mut self,
        local: &Map<String, Value>,
        term: &str,
        value: &Value,
        defined: &mut HashMap<String, bool>,
    ) -> Result<Option<TermDefinition>> {
        if is_keyword(term) {
            return Err(invalid(format!("keyword {term} cannot be redefined")));
        }
        if looks_like_keyword(term) || term.is_empty() {
            return Ok(None);
        }

        let map = match value {
            Value::Null => return Ok(Some(TermDefinition::default())),
            Value::String(_) => {
                let mut map = Map::new();
                map.insert("@id".to_owned(), value.clone());
                map
            }
            Value::Object(map) => map.clone(),
            _ => return Err(invalid("a term definition must be a string, an object or null")),
        };

        let mut definition = TermDefinition::default();

        if let Some(reverse) = map.get("@reverse") {
            if map.contains_key("@id") || map.contains_key("@nest") {
                return Err(invalid("@reverse cannot be combined with @id or @nest"));
            }
            let Value::String(reverse) = reverse else {
                return Err(invalid("@reverse must be a string"));
            };
            match self.expand_defining(local, reverse, defined)? {
                Some(iri) if iri.contains(':') && !is_keyword(&iri) => definition.iri = Some(iri),
                _ => return Err(invalid(format!("invalid @reverse IRI '{reverse}'"))),
            }
            definition.reverse = true;
        } else if let Some(id) = map.get("@id") {
            match id {
                Value::Null => {}
                Value::String(id) if looks_like_keyword(id) && !is_keyword(id) => return Ok(None),
                Value::String(id) => match self.expand_defining(local, id, defined)? {
                    Some(iri) if iri == "@context" => {
                        return Err(invalid("@context cannot be aliased"))
                    }
                    Some(iri) if is_keyword(&iri) || iri.contains(':') => {
                        definition.iri = Some(iri);
                    }
                    _ => return Err(invalid(format!("invalid IRI mapping '{id}'"))),
                },
                _ => return Err(invalid("@id must be a string or null")),
            }
        } else if let Some((prefix, suffix)) = term.split_once(':') {
            if local.contains_key(prefix) && prefix != term {
                self.define(local, prefix, defined)?;
            }
            let namespace = self.terms.get(prefix).and_then(|d| d.iri.clone());
            definition.iri = Some(match namespace {
                Some(namespace) => format!("{namespace}{suffix}"),
                None => term.to_owned(),
            });
        } else if let Some(vocab) = &self.vocab {
            definition.iri = Some(format!("{vocab}{term}"));
        } else {
            return Err(invalid("term has no IRI mapping and no @vocab is set"));
        }

        if let Some(kind) = map.get("@type") {
            let Value::String(kind) = kind else {
                return Err(invalid("@type in a term definition must be a string"));
            };
            definition.type_mapping = Some(match kind.as_str() {
                "@id" => TypeMapping::Id,
                "@vocab" => TypeMapping::Vocab,
                "@json" => TypeMapping::Json,
                "@none" => TypeMapping::None,
                _ => match self.expand_defining(local, kind, defined)? {
                    Some(datatype) if iri::is_absolute(&datatype) => TypeMapping::Datatype(datatype),
                    _ => return Err(invalid(format!("invalid type mapping '{kind}'"))),
                },
            });
        }

        if let Some(container) = map.get("@container") {
            definition.container = container_mapping(container)?;
            if definition.reverse
                && !matches!(definition.container, Container::None | Container::Set | Container::Index)
            {
                return Err(invalid("a reverse property can only use a @set or @index container"));
            }
        }

        if let Some(language) = map.get("@language") {
            definition.language = Some(match language {
                Value::Null => None,
                Value::String(tag) => Some(tag.to_ascii_lowercase()),
                _ => return Err(invalid("@language must be a string or null")),
            });
        }

        if let Some(direction) = map.get("@direction") {
            check_direction(direction)?;
        }
        if let Some(scoped) = map.get("@context") {
            definition.context = Some(scoped.clone());
        }

        for key in map.keys() {
            match key.as_str() {
                "@id" | "@reverse" | "@type" | "@container" | "@language" | "@direction"
                | "@context" | "@prefix" | "@protected" | "@index" => {}
                "@nest" => return Err(invalid("@nest is not supported")),
                other => {
                    return Err(invalid(format!("invalid term definition entry '{other}'")))
                }
            }
        }

        Ok(Some(definition))
    }

    /// IRI expansion while a local context is being processed: terms the
    /// value refers to are defined first.
    fn expand_defining(
        &mut self,
        local: &Map<String, Value>,
        value: &str,
        defined: &mut HashMap<String, bool>,
    ) -> Result<Option<String>> {
        if local.contains_key(value) {
            self.define(local, value, defined)?;
        }
        if let Some((prefix, suffix)) = value.split_once(':') {
            if prefix != "_" && !suffix.starts_with("//") && local.contains_key(prefix) {
                self.define(local, prefix, defined)?;
            }
        }
        Ok(self.expand_iri(value, false, true))
    }

    /// Expands a term, compact IRI or relative reference.
    ///
    /// `vocab` allows term and `@vocab` expansion; `document_relative`
    /// resolves what is left against the base. Returns `None` when the
    /// value is mapped to `null` or looks like an unknown keyword.
    pub(super) fn expand_iri(&self, value: &str, document_relative: bool, vocab: bool) -> Option<String> {
        if is_keyword(value) {
            return Some(value.to_owned());
        }
        if looks_like_keyword(value) {
            return None;
        }
        if vocab {
            if let Some(definition) = self.terms.get(value) {
                return definition.iri.clone();
            }
        }
        if let Some((prefix, suffix)) = value.split_once(':') {
            if prefix == "_" || suffix.starts_with("//") {
                return Some(value.to_owned());
            }
            if let Some(namespace) = self.terms.get(prefix).and_then(|d| d.iri.as_ref()) {
                return Some(format!("{namespace}{suffix}"));
            }
            if iri::is_absolute(value) {
                return Some(value.to_owned());
            }
        }
        if vocab {
            if let Some(namespace) = &self.vocab {
                return Some(format!("{namespace}{value}"));
            }
        }
        if document_relative {
            if let Some(base) = &self.base {
                return Some(iri::resolve(base, value));
            }
        }
        Some(value.to_owned())
    }
}

fn check_direction(direction: &Value) -> Result<()> {
    match direction {
        Value::Null => Ok(()),
        Value::String(value) if value == "ltr" || value == "rtl" => Ok(()),
        _ => Err(invalid("@direction must be \"ltr\", \"rtl\" or null")),
    }
}

fn container_mapping(value: &Value) -> Result<Container> {
    let entries = match value {
        Value::Array(entries) => entries.as_slice(),
        other => std::slice::from_ref(other),
    };
    let mut container = Container::None;
    for entry in entries {
        let kind = match entry.as_str() {
            Some("@list") => Container::List,
            Some("@set") => Container::Set,
            Some("@language") => Container::Language,
            Some("@index") => Container::Index,
            Some(other @ ("@graph" | "@id" | "@type")) => {
                return Err(invalid(format!("{other} containers are not supported")))
            }
            _ => return Err(invalid("invalid @container mapping")),
        };
        // @set only marks the values as unordered; any other kind wins.
        if container == Container::None || container == Container::Set {
            container = kind;
        } else if kind != Container::Set {
            return Err(invalid("conflicting @container mappings"));
        }
    }
    Ok(container)
}
