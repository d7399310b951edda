// Retrieval benchmarks over generated maintenance manuals
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use liftdoc_core::{
    Corpus, DenseFeatures, Embedder, HashEmbedder, Retriever, RetrieverConfig, ScoreConversion,
    ScoringStrategy,
};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::sync::Arc;

const WORDS: [&str; 24] = [
    "door", "sensor", "brake", "coil", "roller", "guide", "rail", "cable", "sheave", "motor",
    "encoder", "landing", "cabin", "fault", "relay", "contactor", "governor", "buffer", "light",
    "curtain", "lubrication", "alignment", "clearance", "inspection",
];

fn generate_passages(count: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let len = rng.random_range(12..40);
            let words: Vec<&str> = (0..len)
                .map(|_| WORDS[rng.random_range(0..WORDS.len())])
                .collect();
            format!("Section {}: {}", i, words.join(" "))
        })
        .collect()
}

fn retriever(passages: &[String], strategy: ScoringStrategy) -> Retriever {
    let embedder: Arc<dyn Embedder> = Arc::new(HashEmbedder::default());
    let mut corpus = Corpus::build(passages).unwrap();
    if strategy.requires_dense() {
        let texts: Vec<&str> = corpus.texts().collect();
        let vectors = embedder.embed_batch(&texts).unwrap();
        let features = DenseFeatures::new(embedder.dim(), vectors).unwrap();
        corpus = corpus.with_dense_features(features).unwrap();
    }
    let config = RetrieverConfig {
        strategy,
        ..RetrieverConfig::default()
    };
    Retriever::new(corpus, config, Some(embedder)).unwrap()
}

fn benchmark_corpus_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("corpus_build");

    for size in [100, 1000, 10000].iter() {
        let passages = generate_passages(*size, 42);
        group.bench_with_input(BenchmarkId::from_parameter(size), &passages, |b, passages| {
            b.iter(|| Corpus::build(black_box(passages)).unwrap());
        });
    }

    group.finish();
}

fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let passages = generate_passages(10000, 7);

    let strategies = [
        ("lexical", ScoringStrategy::LexicalCosine),
        ("keyword", ScoringStrategy::KeywordOverlap),
        ("hybrid", ScoringStrategy::lexical_hybrid()),
        (
            "dense",
            ScoringStrategy::Dense {
                conversion: ScoreConversion::default(),
            },
        ),
    ];

    for (name, strategy) in strategies {
        let retriever = retriever(&passages, strategy);
        group.bench_function(BenchmarkId::new(name, passages.len()), |b| {
            b.iter(|| retriever.search(black_box("door sensor alignment fault"), 5));
        });
    }

    group.finish();
}

fn benchmark_top_k(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_k");
    let passages = generate_passages(10000, 11);
    let retriever = retriever(&passages, ScoringStrategy::LexicalCosine);

    for k in [1, 10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(k), k, |b, &k| {
            b.iter(|| retriever.search(black_box("brake coil relay"), k));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_corpus_build, benchmark_search, benchmark_top_k);
criterion_main!(benches);
