use criterion::{criterion_group, criterion_main, Criterion};
use vagas_core::tfidf::TfidfVectorizer;
use vagas_core::tokenizer::tokenize;

fn sample_corpus() -> Vec<String> {
    (0..200)
        .map(|i| {
            format!(
                "vaga de desenvolvedor de software nivel {i:03} com experiência em \
                 python, sistemas distribuídos e atendimento acessível"
            )
        })
        .collect()
}

fn bench_tokenize(c: &mut Criterion) {
    let corpus = sample_corpus();
    c.bench_function("tokenize_description", |b| b.iter(|| tokenize(&corpus[0])));
}

fn bench_fit_transform(c: &mut Criterion) {
    let corpus = sample_corpus();
    c.bench_function("fit_transform_200", |b| {
        b.iter(|| TfidfVectorizer::fit_transform(&corpus))
    });
}

criterion_group!(benches, bench_tokenize, bench_fit_transform);
criterion_main!(benches);
