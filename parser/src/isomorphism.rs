//! Graph isomorphism: triple-set equality modulo blank-node renaming.
//!
//! Ground triples are compared directly. Blank nodes are first partitioned
//! by iterated neighbourhood hashing, then matched by backtracking within
//! each colour class.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use crate::model::{BlankNode, Subject, Term, Triple};

type Colors<'t> = HashMap<&'t BlankNode, u64>;

/// Returns true if the two triple sets are isomorphic. Both inputs must be
/// free of duplicates.
pub(crate) fn isomorphic(a: &[Triple], b: &[Triple]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let (ground_a, blank_a) = partition(a);
    let (ground_b, blank_b) = partition(b);
    if ground_a.len() != ground_b.len() || blank_a.len() != blank_b.len() {
        return false;
    }
    let ground_b: HashSet<&Triple> = ground_b.into_iter().collect();
    if !ground_a.iter().all(|t| ground_b.contains(t)) {
        return false;
    }
    if blank_a.is_empty() {
        return true;
    }

    let colors_a = colors(&blank_a);
    let colors_b = colors(&blank_b);
    if histogram(&colors_a) != histogram(&colors_b) {
        return false;
    }

    let mut classes: HashMap<u64, Vec<&BlankNode>> = HashMap::new();
    for (node, color) in &colors_b {
        classes.entry(*color).or_default().push(node);
    }
    let class_size = |node: &&BlankNode| {
        colors_a
            .get(*node)
            .and_then(|color| classes.get(color))
            .map_or(0, Vec::len)
    };
    let mut order: Vec<&BlankNode> = colors_a.keys().copied().collect();
    order.sort_by_key(|node| (class_size(node), node.label().to_owned()));

    let mut incident: HashMap<&BlankNode, Vec<&Triple>> = HashMap::new();
    for &triple in &blank_a {
        for node in blank_nodes(triple) {
            incident.entry(node).or_default().push(triple);
        }
    }

    let mut search = Search {
        order,
        colors: &colors_a,
        classes: &classes,
        incident: &incident,
        target: blank_b.into_iter().collect(),
        mapping: HashMap::new(),
        used: HashSet::new(),
    };
    search.extend(0)
}

fn partition(triples: &[Triple]) -> (Vec<&Triple>, Vec<&Triple>) {
    triples
        .iter()
        .partition(|t| t.subject.as_blank_node().is_none() && t.object.as_blank_node().is_none())
}

fn blank_nodes(triple: &Triple) -> impl Iterator<Item = &BlankNode> {
    triple
        .subject
        .as_blank_node()
        .into_iter()
        .chain(triple.object.as_blank_node())
}

/// `DefaultHasher::new()` uses fixed keys, so colours are reproducible
/// across calls and runs. They are never persisted.
fn hash_of(value: impl Hash) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Hash of a term with blank nodes replaced by their colour.
fn term_key(term: &Term, colors: &Colors<'_>) -> u64 {
    match term {
        Term::Iri(iri) => hash_of((0u8, iri)),
        Term::Literal(literal) => hash_of((1u8, literal)),
        Term::BlankNode(node) => hash_of((2u8, colors.get(node).copied().unwrap_or_default())),
    }
}

fn subject_key(subject: &Subject, colors: &Colors<'_>) -> u64 {
    match subject {
        Subject::Iri(iri) => hash_of((0u8, iri)),
        Subject::BlankNode(node) => hash_of((2u8, colors.get(node).copied().unwrap_or_default())),
    }
}

/// Refines blank-node colours until the partition stops splitting.
fn colors<'t>(triples: &[&'t Triple]) -> Colors<'t> {
    let mut colors: Colors<'t> = triples
        .iter()
        .flat_map(|&t| blank_nodes(t))
        .map(|node| (node, 0))
        .collect();
    let mut classes = 1;

    for _ in 0..=colors.len() {
        let mut signatures: HashMap<&BlankNode, Vec<u64>> = HashMap::new();
        for triple in triples {
            if let Some(node) = triple.subject.as_blank_node() {
                let edge = hash_of((0u8, &triple.predicate, term_key(&triple.object, &colors)));
                signatures.entry(node).or_default().push(edge);
            }
            if let Some(node) = triple.object.as_blank_node() {
                let edge = hash_of((1u8, &triple.predicate, subject_key(&triple.subject, &colors)));
                signatures.entry(node).or_default().push(edge);
            }
        }
        let next: Colors<'t> = colors
            .iter()
            .map(|(&node, &color)| {
                let mut signature = signatures.remove(node).unwrap_or_default();
                signature.sort_unstable();
                (node, hash_of((color, signature)))
            })
            .collect();
        let next_classes = next.values().collect::<HashSet<_>>().len();
        colors = next;
        if next_classes == classes {
            break;
        }
        classes = next_classes;
    }
    colors
}

fn histogram(colors: &Colors<'_>) -> HashMap<u64, usize> {
    let mut counts = HashMap::new();
    for color in colors.values() {
        *counts.entry(*color).or_insert(0) += 1;
    }
    counts
}

struct Search<'a, 't> {
    order: Vec<&'t BlankNode>,
    colors: &'a Colors<'t>,
    classes: &'a HashMap<u64, Vec<&'t BlankNode>>,
    incident: &'a HashMap<&'t BlankNode, Vec<&'t Triple>>,
    target: HashSet<&'t Triple>,
    mapping: HashMap<&'t BlankNode, &'t BlankNode>,
    used: HashSet<&'t BlankNode>,
}

impl<'t> Search<'_, 't> {
    fn extend(&mut self, depth: usize) -> bool {
        let Some(&node) = self.order.get(depth) else {
            return true;
        };
        let (colors, classes) = (self.colors, self.classes);
        let Some(candidates) = colors.get(node).and_then(|c| classes.get(c)) else {
            return false;
        };
        for &candidate in candidates {
            if self.used.contains(candidate) {
                continue;
            }
            self.mapping.insert(node, candidate);
            self.used.insert(candidate);
            if self.consistent(node) && self.extend(depth + 1) {
                return true;
            }
            self.mapping.remove(node);
            self.used.remove(candidate);
        }
        false
    }

    /// Checks every triple around `node` whose blank nodes are all mapped.
    fn consistent(&self, node: &BlankNode) -> bool {
        let Some(triples) = self.incident.get(node) else {
            return true;
        };
        triples.iter().all(|triple| match self.map(triple) {
            Some(mapped) => self.target.contains(&mapped),
            None => true,
        })
    }

    fn map(&self, triple: &Triple) -> Option<Triple> {
        let subject = match &triple.subject {
            Subject::BlankNode(node) => Subject::BlankNode((*self.mapping.get(node)?).clone()),
            other => other.clone(),
        };
        let object = match &triple.object {
            Term::BlankNode(node) => Term::BlankNode((*self.mapping.get(node)?).clone()),
            other => other.clone(),
        };
        Some(Triple {
            subject,
            predicate: triple.predicate.clone(),
            object,
        })
    }
}
