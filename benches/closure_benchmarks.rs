//! Performance benchmarks for closing symbol tables.
//!
//! - `chain_N`: every stub references one new symbol, one pass per link
//! - `wide_N`: N independent symbols, a single pass
//! - `artifacts_N`: half of the symbols come from a compiled artifact index
//!
//! ## Profiling with Puffin
//!
//! ```bash
//! cargo bench --features profile-with-puffin
//! ```

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use irlink::{
    ArtifactDeserializer, CompiledArtifactIndex, DeclarationStubGenerator, Descriptor,
    ExternalDependenciesGenerator, SymbolKind, SymbolTable,
};
use std::hint::black_box;

#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

/// A function whose stub references the next one, `len` links long.
fn chain(len: usize) -> Descriptor {
    let mut descriptor = Descriptor::new(format!("lib.f{len}"));
    for i in (0..len).rev() {
        descriptor = Descriptor::new(format!("lib.f{i}"))
            .with_reference(SymbolKind::SimpleFunction, descriptor);
    }
    descriptor
}

fn wide_table(n: usize) -> SymbolTable {
    let mut table = SymbolTable::new();
    for i in 0..n {
        let kind = SymbolKind::ALL[i % SymbolKind::COUNT];
        table.reference(kind, Descriptor::new(format!("lib.s{i}")));
    }
    table
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain");
    for len in [10usize, 100, 500] {
        let root = chain(len);
        group.throughput(Throughput::Elements(len as u64 + 1));
        group.bench_function(format!("chain_{len}"), |b| {
            b.iter_batched(
                || {
                    let mut table = SymbolTable::new();
                    table.reference(SymbolKind::SimpleFunction, root.clone());
                    table
                },
                |mut table| {
                    let output = ExternalDependenciesGenerator::new(
                        &mut table,
                        DeclarationStubGenerator::new(),
                    )
                    .generate_unbound_symbols_as_dependencies();
                    black_box(output)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_wide(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide");
    for n in [1_000usize, 10_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("wide_{n}"), |b| {
            b.iter_batched(
                || wide_table(n),
                |mut table| {
                    let output = ExternalDependenciesGenerator::new(
                        &mut table,
                        DeclarationStubGenerator::new(),
                    )
                    .generate_unbound_symbols_as_dependencies();
                    black_box(output)
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_artifacts(c: &mut Criterion) {
    let mut group = c.benchmark_group("artifacts");
    let n = 10_000usize;
    group.throughput(Throughput::Elements(n as u64));
    group.bench_function(format!("artifacts_{n}"), |b| {
        b.iter_batched(
            || {
                let mut index = CompiledArtifactIndex::new();
                for i in (0..n).step_by(2) {
                    let kind = SymbolKind::ALL[i % SymbolKind::COUNT];
                    index.add_declaration("dep", kind, Descriptor::new(format!("lib.s{i}")));
                }
                (wide_table(n), ArtifactDeserializer::new(index))
            },
            |(mut table, deserializer)| {
                let output =
                    ExternalDependenciesGenerator::new(&mut table, DeclarationStubGenerator::new())
                        .with_deserializer(deserializer)
                        .generate_unbound_symbols_as_dependencies();
                black_box(output)
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

fn benches(c: &mut Criterion) {
    setup_profiler();
    bench_chain(c);
    bench_wide(c);
    bench_artifacts(c);
}

criterion_group!(closure_benches, benches);
criterion_main!(closure_benches);
