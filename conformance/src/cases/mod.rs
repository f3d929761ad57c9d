//! Embedded conformance cases.
//!
//! Each case is one graph written in several syntaxes. The first document is
//! the N-Triples reference; every other document must parse to an isomorphic
//! graph. All documents are parsed without an explicit base.

mod literals;
mod relative;
mod structure;

/// One graph in several syntaxes.
#[derive(Debug, Clone, Copy)]
pub struct Case {
    /// Short identifier used in reports.
    pub name: &'static str,
    /// `(content type, document)` pairs, N-Triples first.
    pub documents: &'static [(&'static str, &'static str)],
}

/// Every embedded case.
pub const ALL: &[Case] = &[literals::CASE, structure::CASE, relative::CASE];
