#![allow(clippy::panic)]

use codspeed_criterion_compat::{criterion_group, criterion_main, Criterion};
use hexaplex_encoding::{decode_qualifier, decode_statement, encode_statement, KeyFragment};
use hexaplex_model::{GraphName, Literal, NamedNode, Quad};
use std::hint::black_box;

fn statement(graph: bool) -> Quad {
    Quad::new(
        NamedNode::new_unchecked("http://example.com/person/42"),
        NamedNode::new_unchecked("http://xmlns.com/foaf/0.1/name"),
        Literal::new_language_tagged_literal_unchecked("Ada Lovelace", "en"),
        if graph {
            NamedNode::new_unchecked("http://example.com/graph/people").into()
        } else {
            GraphName::DefaultGraph
        },
    )
}

/// These benchmarks measure hashing the canonical text of a term.
fn key_fragment_digest(c: &mut Criterion) {
    c.bench_function("KeyFragment::digest - IRI", |b| {
        b.iter(|| black_box(KeyFragment::digest(black_box("<http://example.com/person/42>"))));
    });
}

/// These benchmarks measure encoding statements into index records.
fn encode(c: &mut Criterion) {
    let triple = statement(false);
    c.bench_function("encode_statement - Default graph", |b| {
        b.iter(|| black_box(encode_statement(triple.as_ref(), false, 0)));
    });

    let quad = statement(true);
    c.bench_function("encode_statement - Named graph", |b| {
        b.iter(|| black_box(encode_statement(quad.as_ref(), false, 0)));
    });
}

/// These benchmarks measure reading the cells of a graph-scoped row.
fn decode(c: &mut Criterion) {
    let Ok(records) = encode_statement(statement(true).as_ref(), false, 0) else {
        panic!("Statement must be encodable")
    };
    let record = &records[4];

    c.bench_function("decode_qualifier - Named graph", |b| {
        b.iter(|| {
            let Ok(decoded) = decode_qualifier(black_box(&record.qualifier)) else {
                panic!("Qualifier must be valid")
            };
            black_box(decoded);
        });
    });

    c.bench_function("decode_statement - Named graph", |b| {
        b.iter(|| {
            let Ok(quad) = decode_statement(black_box(&record.row), black_box(&record.qualifier))
            else {
                panic!("Record must be valid")
            };
            black_box(quad);
        });
    });
}

criterion_group!(codec, key_fragment_digest, encode, decode);
criterion_main!(codec);
