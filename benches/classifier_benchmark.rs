use std::collections::HashMap;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use newscheck::classifier::{
    LogisticRegression, LogisticRegressionArtifact, TextVectorizer, TfidfArtifact, TfidfVectorizer,
};
use newscheck::{NewsClassifier, Preprocessing};

const VOCABULARY_SIZE: usize = 20_000;

fn setup_vectorizer() -> TfidfVectorizer {
    let vocabulary: HashMap<String, usize> = (0..VOCABULARY_SIZE).map(|i| (format!("term{}", i), i)).collect();
    let artifact: TfidfArtifact = serde_json::from_value(serde_json::json!({
        "vocabulary": vocabulary,
        "idf": vec![1.5; VOCABULARY_SIZE],
        "ngram_range": [1, 2],
    }))
    .unwrap();
    TfidfVectorizer::from_artifact(artifact).unwrap()
}

fn setup_benchmark_classifier(preprocessing: Preprocessing) -> NewsClassifier {
    let coef: Vec<f64> = (0..VOCABULARY_SIZE).map(|i| if i % 2 == 0 { 0.3 } else { -0.3 }).collect();
    let model = LogisticRegression::from_artifact(LogisticRegressionArtifact {
        classes: vec![0, 1],
        coef: vec![coef],
        intercept: vec![0.1],
    })
    .unwrap();

    NewsClassifier::builder()
        .with_preprocessing(preprocessing)
        .with_model(Arc::new(model))
        .unwrap()
        .with_vectorizer(Arc::new(setup_vectorizer()))
        .unwrap()
        .build()
        .unwrap()
}

fn article(words: usize) -> String {
    (0..words)
        .map(|i| format!("Term{}", (i * 7919) % (VOCABULARY_SIZE + 500)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_vectorization(c: &mut Criterion) {
    let vectorizer = setup_vectorizer();
    let mut group = c.benchmark_group("Vectorization");

    // Configure sampling
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    let short = article(12);
    let medium = article(150);
    let long = article(1500);

    group.bench_function("short_text", |b| b.iter(|| vectorizer.transform(black_box(&short)).unwrap()));
    group.bench_function("medium_text", |b| b.iter(|| vectorizer.transform(black_box(&medium)).unwrap()));
    group.bench_function("long_text", |b| b.iter(|| vectorizer.transform(black_box(&long)).unwrap()));

    group.finish();
}

fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("Classification");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    let text = article(300);
    for preprocessing in [Preprocessing::Identity, Preprocessing::Lowercase] {
        let classifier = setup_benchmark_classifier(preprocessing);
        group.bench_function(format!("classify_{}", preprocessing), |b| {
            b.iter(|| classifier.classify(black_box(&text)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_vectorization, bench_classification);
criterion_main!(benches);
