//! Parses one RDF file, choosing the grammar from its extension, and prints
//! the triples in N-Triples form.
//!
//! ```text
//! cargo run -p serializedform --example parse_file -- parser/tests/data/test-04.ttl
//! ```

use std::fs::File;
use std::path::Path;

use serializedform::{parsing_provider, GrammarId, SimpleGraph};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: parse_file <path>");
        std::process::exit(2);
    };
    let path = Path::new(&path);
    let grammar = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(GrammarId::from_extension)
        .ok_or("unrecognized file extension")?;

    let mut graph = SimpleGraph::new();
    parsing_provider().parse(&mut graph, File::open(path)?, grammar.media_type(), None)?;

    for triple in &graph {
        println!("{triple}");
    }
    eprintln!("{} triples ({grammar})", graph.len());
    Ok(())
}
