//! Performance benchmarks for docsift
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use docsift::index::DocumentStore;
use docsift::output::format;
use docsift::query::{SearchOptions, parse_query, search};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const WORDS: &[&str] = &[
    "compute", "optimal", "transport", "plan", "cost", "matrix", "histogram", "source",
    "target", "distribution", "solver", "euclidean", "normal", "discrete", "measure", "metric",
];

/// Generate a search index shaped like a documentation build's output
fn synthetic_index(entries: usize) -> String {
    let docs: Vec<serde_json::Value> = (0..entries)
        .map(|i| {
            let text: Vec<&str> = (0..60).map(|j| WORDS[(i * 7 + j * 3) % WORDS.len()]).collect();
            serde_json::json!({
                "location": format!("#Package.func_{}", i),
                "page": format!("Page {}", i % 25),
                "title": format!("Package.func_{} {}", i, WORDS[i % WORDS.len()]),
                "text": text.join(" "),
                "category": if i % 3 == 0 { "function" } else { "method" },
            })
        })
        .collect();

    format!(
        "var documenterSearchIndex = {{\"docs\":\n{}\n}}",
        serde_json::Value::Array(docs)
    )
}

/// Write a synthetic index into a temp dir for load benchmarks
fn create_benchmark_fixture(entries: usize) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("search_index.js");
    fs::write(&path, synthetic_index(entries)).expect("Failed to write index");
    (temp_dir, path)
}

fn bench_query_parsing(c: &mut Criterion) {
    let queries = vec![
        "simple",
        "two words",
        "optimal transport plan",
        "category:function cost",
        "page:Home* transport",
        "\"quoted words\" cat:method",
    ];

    let mut group = c.benchmark_group("query_parsing");
    for query in queries {
        group.bench_with_input(BenchmarkId::from_parameter(query), &query, |b, &q| {
            b.iter(|| parse_query(black_box(q)))
        });
    }
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let short = "ExactOptimalTransport.ot_plan";
    let long = "Compute the optimal transport plan γ for the Monge-Kantorovich problem \
                with source histogram μ, target histogram ν, and cost matrix C. "
        .repeat(20);

    let mut group = c.benchmark_group("normalize");
    group.bench_function("title", |b| {
        b.iter(|| docsift::utils::normalize(black_box(short)))
    });
    group.bench_function("text_2kb", |b| {
        b.iter(|| docsift::utils::normalize(black_box(&long)))
    });
    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    for entries in [100, 1_000, 10_000] {
        let (_temp_dir, path) = create_benchmark_fixture(entries);
        group.bench_with_input(BenchmarkId::from_parameter(entries), &path, |b, path| {
            b.iter(|| DocumentStore::open(black_box(path)))
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let store = DocumentStore::load(&synthetic_index(10_000)).expect("Failed to load index");
    let options = SearchOptions::default();

    let mut group = c.benchmark_group("search");

    group.bench_function("single_term", |b| {
        b.iter(|| search(&store, black_box("transport"), &options))
    });

    group.bench_function("three_terms", |b| {
        b.iter(|| search(&store, black_box("optimal transport plan"), &options))
    });

    group.bench_function("category_filter", |b| {
        b.iter(|| search(&store, black_box("cost category:function"), &options))
    });

    group.bench_function("unlimited", |b| {
        let options = SearchOptions::default().with_limit(i64::MAX);
        b.iter(|| search(&store, black_box("metric"), &options))
    });

    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let store = DocumentStore::load(&synthetic_index(1_000)).expect("Failed to load index");
    let options = SearchOptions::default().with_limit(100);
    let matches = search(&store, "histogram", &options).expect("Search failed");

    c.bench_function("format_100", |b| b.iter(|| format(black_box(&matches))));
}

criterion_group!(
    benches,
    bench_query_parsing,
    bench_normalize,
    bench_load,
    bench_search,
    bench_format,
);

criterion_main!(benches);
