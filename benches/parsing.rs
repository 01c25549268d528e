use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use confval::{from_json_str, from_toml_inline_str, from_toml_str, to_json_string, Value};

fn sample_document(entries: usize) -> String {
    let mut doc = String::from("title = \"benchmark\"\n\n");
    for i in 0..entries {
        doc.push_str(&format!(
            "[[services]]\nname = \"svc-{i}\"\nport = {}\nweight = {}.5\nhosts = ['a{i}', 'b{i}']\n\n",
            8000 + i,
            i
        ));
    }
    doc
}

fn sample_tree(entries: usize) -> Value {
    from_toml_str(&sample_document(entries)).unwrap()
}

fn benchmark_parse_toml_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_toml_document");

    for size in [10, 50, 100, 500].iter() {
        let doc = sample_document(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &doc, |b, doc| {
            b.iter(|| from_toml_str(black_box(doc)))
        });
    }
    group.finish();
}

fn benchmark_parse_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_json");

    for size in [10, 50, 100, 500].iter() {
        let json = to_json_string(&sample_tree(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &json, |b, json| {
            b.iter(|| from_json_str(black_box(json)))
        });
    }
    group.finish();
}

fn benchmark_parse_scalars(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_scalars");

    group.bench_function("integer", |b| {
        b.iter(|| from_toml_inline_str(black_box("5_349_221")))
    });

    group.bench_function("hex_integer", |b| {
        b.iter(|| from_toml_inline_str(black_box("0xdead_beef")))
    });

    group.bench_function("float", |b| {
        b.iter(|| from_toml_inline_str(black_box("224_617.445_991_228")))
    });

    group.bench_function("basic_string", |b| {
        b.iter(|| from_toml_inline_str(black_box("\"a string with \\t escapes\\n\"")))
    });

    group.bench_function("triple_string", |b| {
        b.iter(|| from_toml_inline_str(black_box("\"\"\"\nfolded \\\n   continuation\"\"\"")))
    });

    group.finish();
}

fn benchmark_path_lookup(c: &mut Criterion) {
    let tree = sample_tree(100);
    let mut group = c.benchmark_group("path_lookup");

    group.bench_function("shallow", |b| b.iter(|| tree.find(black_box("title"))));

    group.bench_function("indexed", |b| {
        b.iter(|| tree.find(black_box("services[50].hosts[-1]")))
    });

    group.bench_function("quoted", |b| {
        b.iter(|| tree.find(black_box("services[50]['name']")))
    });

    group.finish();
}

fn benchmark_path_vivify(c: &mut Criterion) {
    c.bench_function("path_vivify_deep", |b| {
        b.iter(|| {
            let mut v = Value::new();
            v.at(black_box("a.b.c.d.e[3].f")).set(1);
            v
        })
    });
}

fn benchmark_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");

    for size in [10, 100, 500].iter() {
        let tree = sample_tree(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &tree, |b, tree| {
            b.iter(|| to_json_string(black_box(tree)))
        });
    }
    group.finish();
}

fn benchmark_comparison_with_serde_json(c: &mut Criterion) {
    let json = to_json_string(&sample_tree(100));
    let mut group = c.benchmark_group("comparison");

    group.bench_function("confval_parse", |b| {
        b.iter(|| from_json_str(black_box(&json)))
    });

    group.bench_function("serde_json_parse", |b| {
        b.iter(|| serde_json::from_str::<serde_json::Value>(black_box(&json)))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_parse_toml_document,
    benchmark_parse_json,
    benchmark_parse_scalars,
    benchmark_path_lookup,
    benchmark_path_vivify,
    benchmark_write,
    benchmark_comparison_with_serde_json
);
criterion_main!(benches);
