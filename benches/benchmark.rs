use criterion::{black_box, criterion_group, criterion_main, Criterion};
use notacalc::{evaluate, evaluate_simple, parse, tokenize, Notation};

const BENCH_EXPRESSIONS_NAMES: [&str; 3] = ["flat", "nested", "long"];
const BENCH_EXPRESSIONS_STRS: [&str; 3] = [
    "2 * 6 - 4 - 3 / 2 + 3 * 4 * 7 - 32 * 9 + 43 * 11",
    "-(1 - 1 / (5 * (3 + 2))) + 5 * (2 / (5 * -(4 - 6)))",
    "123456789 * 987654321 / 3 - 11 * (22 + 33 * (44 - 55 / (66 + 77))) + 1 + 2 + 3 + 4 + 5",
];

fn notacalc_infix(c: &mut Criterion) {
    for (name, text) in BENCH_EXPRESSIONS_NAMES.iter().zip(BENCH_EXPRESSIONS_STRS) {
        c.bench_function(&format!("notacalc_infix_{name}"), |b| {
            b.iter(|| evaluate(black_box(text), Notation::Infix))
        });
    }
}

fn notacalc_tokenize(c: &mut Criterion) {
    for (name, text) in BENCH_EXPRESSIONS_NAMES.iter().zip(BENCH_EXPRESSIONS_STRS) {
        c.bench_function(&format!("notacalc_tokenize_{name}"), |b| {
            b.iter(|| tokenize(black_box(text)))
        });
    }
}

fn notacalc_linear(c: &mut Criterion) {
    for (name, text) in BENCH_EXPRESSIONS_NAMES.iter().zip(BENCH_EXPRESSIONS_STRS) {
        let tree = parse(&tokenize(text).unwrap()).unwrap().unwrap();
        let postfix = tree.to_postfix();
        let prefix = tree.to_prefix();
        c.bench_function(&format!("notacalc_postfix_{name}"), |b| {
            b.iter(|| evaluate(black_box(&postfix), Notation::Postfix))
        });
        c.bench_function(&format!("notacalc_prefix_{name}"), |b| {
            b.iter(|| evaluate(black_box(&prefix), Notation::Prefix))
        });
    }
}

fn notacalc_simple(c: &mut Criterion) {
    c.bench_function("notacalc_simple", |b| {
        b.iter(|| evaluate_simple(black_box("12.375"), black_box("-0.5e2"), "/"))
    });
}

criterion_group!(
    benches,
    notacalc_infix,
    notacalc_tokenize,
    notacalc_linear,
    notacalc_simple
);
criterion_main!(benches);
