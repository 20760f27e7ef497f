//! Parser Benchmarks
//!
//! Run with: `cargo bench --package sablec-par`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use sablec_lex::Lexer;
use sablec_par::parse_file;
use sablec_util::Handler;

fn parse(source: &str) -> usize {
    let mut lexer = Lexer::new(source);
    let dcx = Handler::new();
    let items = parse_file(&mut lexer, &dcx).expect("fatal error");
    items.items.len()
}

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    let simple = "fn main() { let x = 1 + 2 * 3; }";
    group.throughput(Throughput::Bytes(simple.len() as u64));
    group.bench_function("simple_function", |b| {
        b.iter(|| parse(black_box(simple)))
    });

    let mixed = r#"
        struct Point { x: f64, y: f64 }

        enum Shape {
            Circle(f64),
            Rect { w: f64, h: f64 },
        }

        fn area(s: Shape) -> f64 {
            match s {
                c => (c).r * (c).r * 3,
            }
        }

        fn main() {
            let p = Point { x: 1.0, y: 2.0 };
            let mut_total = (p).x + (p).y;
            if mut_total > 10.0 { return; };
        }
    "#;
    group.throughput(Throughput::Bytes(mixed.len() as u64));
    group.bench_function("mixed_items", |b| b.iter(|| parse(black_box(mixed))));

    group.finish();
}

fn bench_expression_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_depth");

    let chain = format!("fn f() {{ {} }}", vec!["1"; 64].join(" + "));
    group.bench_function("long_binary_chain", |b| {
        b.iter(|| parse(black_box(&chain)))
    });

    group.finish();
}

criterion_group!(benches, bench_parser, bench_expression_depth);
criterion_main!(benches);
