//! `sf-parse`: parses one RDF document and reports what it contains.
//!
//! The syntax comes from `--format` or, when omitted, from the file
//! extension (`.rdf`, `.ttl`, `.n3`, `.nt`, `.jsonld`).
//!
//! **Usage:**
//! ```text
//! sf-parse <FILE> [--format <media type>] [--base <iri>] [--list]
//! sf-parse --formats
//! ```
//!
//! Exits non-zero if the document is rejected.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use serializedform::{parsing_provider, GrammarId, Iri, SimpleGraph};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Parse an RDF document into an in-memory graph.
#[derive(Parser)]
#[command(name = "sf-parse", about = "Parse RDF/XML, Turtle, N3, N-Triples or JSON-LD")]
struct Args {
    /// Document to parse.
    #[arg(required_unless_present = "formats")]
    file: Option<PathBuf>,

    /// Content type, e.g. `text/turtle;charset=UTF-8`. Inferred from the
    /// extension when omitted.
    #[arg(long)]
    format: Option<String>,

    /// Absolute base IRI for relative references.
    #[arg(long)]
    base: Option<String>,

    /// Print every triple in N-Triples form.
    #[arg(long)]
    list: bool,

    /// Print the supported content types and exit.
    #[arg(long)]
    formats: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let provider = parsing_provider();

    if args.formats {
        for media_type in provider.supported_formats() {
            println!("{media_type}");
        }
        return Ok(());
    }
    let Some(path) = args.file.as_deref() else {
        bail!("no input file given");
    };

    let content_type = match args.format {
        Some(content_type) => content_type,
        None => infer_content_type(path)?,
    };
    let base = args.base.map(Iri::new);

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut graph = SimpleGraph::new();
    provider
        .parse(&mut graph, file, &content_type, base.as_ref())
        .with_context(|| format!("Failed to parse {} as {content_type}", path.display()))?;

    info!(file = %path.display(), %content_type, triples = graph.len(), "parsed");
    if args.list {
        for triple in &graph {
            println!("{triple}");
        }
    }
    println!("{}: {} triples", path.display(), graph.len());
    Ok(())
}

fn infer_content_type(path: &Path) -> Result<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(GrammarId::from_extension)
        .map(|grammar| grammar.media_type().to_owned())
        .ok_or_else(|| anyhow!("cannot infer a format for {}; pass --format", path.display()))
}
