//! Performance benchmarks for weft

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::path::Path;

use weft::readers::{parse_web, ReaderOptions};
use weft::tangle::{tangle_output, TangleOptions};

fn generate_web(num_chunks: usize, lines_per_chunk: usize) -> String {
    let mut web = String::from("A generated benchmark document.\n\n");

    web.push_str("@o output.py @{");
    for i in 0..num_chunks {
        web.push_str(&format!("@<block{}@>\n", i));
    }
    web.push_str("@}\n\n");

    for i in 0..num_chunks {
        web.push_str(&format!("Prose about block {}.\n\n@d block{} @{{", i, i));
        for j in 0..lines_per_chunk {
            web.push_str(&format!("print('block {} line {}')\n", i, j));
        }
        web.push_str("@}\n\n");
    }

    web
}

fn generate_nested_web(depth: usize, breadth: usize) -> String {
    fn emit(web: &mut String, name: &str, depth: usize, breadth: usize, is_root: bool) {
        if is_root {
            web.push_str("@o output.py @{");
        } else {
            web.push_str(&format!("@d {} @{{", name));
        }

        if depth > 0 {
            for i in 0..breadth {
                web.push_str(&format!("if True:\n    @<{}_{}@>\n", name, i));
            }
        } else {
            web.push_str("pass\n");
        }
        web.push_str("@}\n\n");

        if depth > 0 {
            for i in 0..breadth {
                let child = format!("{}_{}", name, i);
                emit(web, &child, depth - 1, breadth, false);
            }
        }
    }

    let mut web = String::from("Nested benchmark document.\n\n");
    emit(&mut web, "c", depth, breadth, true);
    web
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_web");
    let options = ReaderOptions::default();

    for num_chunks in [10, 50, 100, 500].iter() {
        let web = generate_web(*num_chunks, 10);
        group.bench_with_input(BenchmarkId::new("chunks", num_chunks), &web, |b, web| {
            b.iter(|| parse_web(black_box(web), None, &options).unwrap())
        });
    }

    group.finish();
}

fn bench_tangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("tangle");
    let options = ReaderOptions::default();
    let tangle_options = TangleOptions::default();

    for num_chunks in [10, 50, 100, 500].iter() {
        let text = generate_web(*num_chunks, 10);
        let web = parse_web(&text, None, &options).unwrap();

        group.bench_with_input(BenchmarkId::new("chunks", num_chunks), &web, |b, web| {
            b.iter(|| tangle_output(black_box(web), Path::new("output.py"), &tangle_options).unwrap())
        });
    }

    group.finish();
}

fn bench_tangle_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("tangle_nested");
    let options = ReaderOptions::default();
    let tangle_options = TangleOptions::default();

    for depth in [2, 3, 4, 5].iter() {
        let text = generate_nested_web(*depth, 3);
        let web = parse_web(&text, None, &options).unwrap();
        let total = web.len();

        group.bench_with_input(
            BenchmarkId::new("depth", format!("d{}({}chunks)", depth, total)),
            &web,
            |b, web| {
                b.iter(|| {
                    tangle_output(black_box(web), Path::new("output.py"), &tangle_options).unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_tangle, bench_tangle_nested);
criterion_main!(benches);
