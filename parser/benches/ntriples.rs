//! Benchmarks for parsing generated documents in each line-oriented syntax.

use std::fmt::Write as _;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serializedform::{parsing_provider, SimpleGraph};

fn ntriples_document(triples: usize) -> String {
    let mut text = String::new();
    for i in 0..triples {
        let _ = match i % 3 {
            0 => writeln!(
                text,
                "<http://example.org/s{}> <http://example.org/p> <http://example.org/o{i}> .",
                i / 3
            ),
            1 => writeln!(
                text,
                "<http://example.org/s{}> <http://example.org/name> \"name {i}\"@en .",
                i / 3
            ),
            _ => writeln!(text, "_:b{} <http://example.org/rank> \"{i}\"^^<http://www.w3.org/2001/XMLSchema#integer> .", i / 3),
        };
    }
    text
}

fn turtle_document(subjects: usize) -> String {
    let mut text = String::from("@prefix ex: <http://example.org/> .\n");
    for i in 0..subjects {
        let _ = writeln!(
            text,
            "ex:s{i} a ex:Thing ; ex:name \"name {i}\"@en ; ex:rank {i} ; ex:tags ( ex:a ex:b ) ."
        );
    }
    text
}

fn parse(text: &str, content_type: &str) -> SimpleGraph {
    let mut graph = SimpleGraph::new();
    let _ = parsing_provider().parse(&mut graph, text.as_bytes(), content_type, None);
    graph
}

fn bench_ntriples(c: &mut Criterion) {
    let mut group = c.benchmark_group("ntriples");
    for size in [100, 1_000, 10_000] {
        let text = ntriples_document(size);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| black_box(parse(black_box(text), "application/n-triples")));
        });
    }
    group.finish();
}

fn bench_turtle(c: &mut Criterion) {
    let mut group = c.benchmark_group("turtle");
    for size in [100, 1_000] {
        let text = turtle_document(size);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| black_box(parse(black_box(text), "text/turtle")));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ntriples, bench_turtle);
criterion_main!(benches);
