use criterion::{criterion_group, criterion_main, Criterion};
use sift_core::tokenizer::tokenize;

fn bench_tokenize(c: &mut Criterion) {
    let text = "The quick brown fox jumps over the lazy dog. \
                Indexing pipelines spend most of their time tokenizing, \
                stemming and counting terms, so the scanner's cost per \
                document matters more than anything else in the build."
        .repeat(64);
    c.bench_function("tokenize_paragraph", |b| b.iter(|| tokenize(&text)));
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
