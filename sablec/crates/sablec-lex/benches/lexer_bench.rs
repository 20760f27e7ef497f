//! Lexer Benchmarks
//!
//! Run with: `cargo bench --package sablec-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use sablec_lex::{Lexer, Token};

fn token_count(source: &str) -> usize {
    let mut stack = vec![Lexer::new(source)];
    let mut count = 0;
    while let Some(mut lexer) = stack.pop() {
        while let Ok(Some(token)) = lexer.next() {
            count += 1;
            if let Token::Group { inner, .. } = token {
                stack.push(lexer);
                stack.push(inner);
                break;
            }
        }
    }
    count
}

fn bench_lexer(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let source = "let x = 42; fn main() { let y = x + 1; return y; }";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("simple_let", |b| {
        b.iter(|| token_count(black_box("let x = 42;")))
    });

    group.bench_function("function_with_body", |b| {
        b.iter(|| token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_complex");

    let source = r#"
        fn fibonacci(n: i32) -> i32 {
            if n <= 1 { n } else { fibonacci(n - 1) + fibonacci(n - 2) }
        }

        struct Point { x: i32, y: i32 }

        enum Color { Red, Green, Blue }

        const GREETING: str = "hello \u{1F600} world";
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("mixed_items", |b| {
        b.iter(|| token_count(black_box(source)))
    });

    group.finish();
}

criterion_group!(benches, bench_lexer, bench_lexer_complex);
criterion_main!(benches);
