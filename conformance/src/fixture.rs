//! Fixture discovery.
//!
//! A fixture directory holds documents whose extension names their syntax.
//! Documents sharing a file stem describe the same graph; the `.nt` member of
//! a group is its reference. Documents under `bad/` must be rejected.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serializedform::{parsing_provider, GrammarId, ImmutableGraph, ParseError, SimpleGraph};
use walkdir::WalkDir;

/// Directory, relative to the fixture root, of documents that must fail.
pub const NEGATIVE_DIR: &str = "bad";

/// A file that cannot be used as a fixture.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// The extension maps to no grammar.
    #[error("{} has no recognized RDF extension", .0.display())]
    UnknownExtension(PathBuf),
    /// The name has no stem to group it by.
    #[error("{} has no file stem", .0.display())]
    Unnamed(PathBuf),
}

/// One fixture document.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Location on disk.
    pub path: PathBuf,
    /// File stem, shared by documents of the same graph.
    pub stem: String,
    /// Syntax inferred from the extension.
    pub grammar: GrammarId,
}

impl Fixture {
    /// Classifies `path` by its extension.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] if the name has no stem or no known
    /// extension.
    pub fn from_path(path: &Path) -> std::result::Result<Self, FixtureError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| FixtureError::Unnamed(path.to_path_buf()))?;
        let grammar = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(GrammarId::from_extension)
            .ok_or_else(|| FixtureError::UnknownExtension(path.to_path_buf()))?;
        Ok(Self {
            path: path.to_path_buf(),
            stem: stem.to_owned(),
            grammar,
        })
    }

    /// Parses the document with the grammar its extension names.
    ///
    /// The outer error is a failure to open the file; the inner result is
    /// the parser's verdict.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn parse(&self) -> Result<std::result::Result<ImmutableGraph, ParseError>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        let mut graph = SimpleGraph::new();
        let verdict = parsing_provider()
            .parse(&mut graph, file, self.grammar.media_type(), None)
            .map(|()| graph.immutable_graph());
        Ok(verdict)
    }

    /// File name for reports.
    #[must_use]
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Everything found under a fixture root.
#[derive(Debug, Default)]
pub struct FixtureSet {
    /// Well-formed documents grouped by stem.
    pub groups: BTreeMap<String, Vec<Fixture>>,
    /// Documents that must be rejected.
    pub negative: Vec<Fixture>,
    /// Files skipped during discovery.
    pub skipped: Vec<FixtureError>,
}

impl FixtureSet {
    /// Walks `root` and sorts every file into a group, the negative set or
    /// the skip list.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` cannot be traversed.
    pub fn discover(root: &Path) -> Result<Self> {
        let mut set = Self::default();
        let negative_root = root.join(NEGATIVE_DIR);

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            match Fixture::from_path(entry.path()) {
                Ok(fixture) if entry.path().starts_with(&negative_root) => {
                    set.negative.push(fixture);
                }
                Ok(fixture) => set
                    .groups
                    .entry(fixture.stem.clone())
                    .or_default()
                    .push(fixture),
                Err(err) => set.skipped.push(err),
            }
        }
        tracing::debug!(
            groups = set.groups.len(),
            negative = set.negative.len(),
            skipped = set.skipped.len(),
            root = %root.display(),
            "discovered fixtures"
        );
        Ok(set)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_extension() {
        let fixture = Fixture::from_path(Path::new("data/test-04.jsonld")).unwrap();
        assert_eq!(fixture.stem, "test-04");
        assert_eq!(fixture.grammar, GrammarId::JsonLd);
        assert_eq!(fixture.name(), "test-04.jsonld");

        let err = Fixture::from_path(Path::new("data/README.md")).unwrap_err();
        assert!(matches!(err, FixtureError::UnknownExtension(_)));
        assert!(err.to_string().contains("README.md"));
    }
}
