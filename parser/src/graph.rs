//! The target graph capability and an in-memory implementation of it.

use std::collections::HashSet;

use crate::isomorphism;
use crate::model::{Iri, Subject, Term, Triple};

/// An append-only sink for parsed triples, owned by the caller.
pub trait Graph {
    /// Adds one triple. Adding a triple the graph already holds is a no-op
    /// for set-like graphs.
    fn insert(&mut self, triple: Triple);
}

impl<G: Graph + ?Sized> Graph for &mut G {
    fn insert(&mut self, triple: Triple) {
        (**self).insert(triple);
    }
}

/// A mutable graph with set semantics that remembers insertion order.
#[derive(Debug, Clone, Default)]
pub struct SimpleGraph {
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
}

impl SimpleGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// True if the graph holds no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// True if the graph holds `triple`.
    #[must_use]
    pub fn contains(&self, triple: &Triple) -> bool {
        self.seen.contains(triple)
    }

    /// Triples in first-insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Triple> {
        self.triples.iter()
    }

    /// Takes a snapshot that compares by isomorphism.
    #[must_use]
    pub fn immutable_graph(&self) -> ImmutableGraph {
        ImmutableGraph {
            triples: self.triples.clone(),
        }
    }
}

impl Graph for SimpleGraph {
    fn insert(&mut self, triple: Triple) {
        if self.seen.insert(triple.clone()) {
            self.triples.push(triple);
        }
    }
}

impl Extend<Triple> for SimpleGraph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }
}

impl FromIterator<Triple> for SimpleGraph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = Self::new();
        graph.extend(iter);
        graph
    }
}

impl<'g> IntoIterator for &'g SimpleGraph {
    type Item = &'g Triple;
    type IntoIter = std::slice::Iter<'g, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A frozen graph.
///
/// Two immutable graphs are equal when they are isomorphic: the same triples
/// up to a consistent renaming of blank nodes. This is the equality used to
/// compare the same document read from different syntaxes.
#[derive(Debug, Clone)]
pub struct ImmutableGraph {
    triples: Vec<Triple>,
}

impl ImmutableGraph {
    /// Number of triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// True if the graph holds no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Triples in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Triple> {
        self.triples.iter()
    }

    /// Triples matching a pattern; `None` matches anything.
    pub fn filter<'g>(
        &'g self,
        subject: Option<&'g Subject>,
        predicate: Option<&'g Iri>,
        object: Option<&'g Term>,
    ) -> impl Iterator<Item = &'g Triple> + 'g {
        self.triples.iter().filter(move |t| {
            subject.map_or(true, |s| t.subject == *s)
                && predicate.map_or(true, |p| t.predicate == *p)
                && object.map_or(true, |o| t.object == *o)
        })
    }
}

impl PartialEq for ImmutableGraph {
    fn eq(&self, other: &Self) -> bool {
        isomorphism::isomorphic(&self.triples, &other.triples)
    }
}

impl Eq for ImmutableGraph {}

impl<'g> IntoIterator for &'g ImmutableGraph {
    type Item = &'g Triple;
    type IntoIter = std::slice::Iter<'g, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlankNode, Literal};

    fn triple(s: &str, o: &str) -> Triple {
        Triple::new(Iri::new(s), Iri::new("http://e/p"), Literal::simple(o))
    }

    #[test]
    fn inserts_are_deduplicated_in_order() {
        let mut graph = SimpleGraph::new();
        graph.insert(triple("http://e/b", "1"));
        graph.insert(triple("http://e/a", "2"));
        graph.insert(triple("http://e/b", "1"));
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.iter().next(), Some(&triple("http://e/b", "1")));
        assert!(graph.contains(&triple("http://e/a", "2")));
    }

    #[test]
    fn filter_matches_patterns() {
        let graph: SimpleGraph = [
            triple("http://e/a", "1"),
            triple("http://e/a", "2"),
            triple("http://e/b", "1"),
        ]
        .into_iter()
        .collect();
        let snapshot = graph.immutable_graph();
        let a = Subject::Iri(Iri::new("http://e/a"));
        let one = Term::Literal(Literal::simple("1"));
        assert_eq!(snapshot.filter(Some(&a), None, None).count(), 2);
        assert_eq!(snapshot.filter(None, None, Some(&one)).count(), 2);
        assert_eq!(snapshot.filter(Some(&a), None, Some(&one)).count(), 1);
        assert_eq!(snapshot.filter(None, None, None).count(), 3);
    }

    #[test]
    fn snapshots_compare_by_isomorphism() {
        let p = Iri::new("http://e/p");
        let left: SimpleGraph = [Triple::new(BlankNode::new("x"), p.clone(), Literal::simple("v"))]
            .into_iter()
            .collect();
        let right: SimpleGraph = [Triple::new(BlankNode::new("y"), p, Literal::simple("v"))]
            .into_iter()
            .collect();
        assert_eq!(left.immutable_graph(), right.immutable_graph());
        assert_ne!(left.immutable_graph(), SimpleGraph::new().immutable_graph());
    }
}
