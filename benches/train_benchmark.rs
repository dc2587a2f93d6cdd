use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hmmtag::{Dataset, SmoothingKind, TrainOpts, Trainer};

const TAGS: [&str; 6] = ["DET", "NOUN", "VERB", "ADJ", "ADP", "PRON"];

/// Deterministic corpus of `n` sentences over a few hundred words.
fn synthetic_corpus(n: usize) -> Dataset {
    let mut s = String::new();
    let mut x: u64 = 0x9e3779b97f4a7c15;
    for _ in 0..n {
        let len = 5 + (x % 20) as usize;
        for i in 0..len {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            let tag = TAGS[(x % TAGS.len() as u64) as usize];
            if i > 0 {
                s.push(' ');
            }
            s.push_str(&format!("w{}/{}", (x >> 8) % 400, tag));
        }
        s.push('\n');
    }
    s.parse().expect("failed to read corpus")
}

fn train_benchmark(c: &mut Criterion) {
    let ds = synthetic_corpus(2000);
    for smoothing in [SmoothingKind::KneserNey, SmoothingKind::Laplace] {
        let trainer = Trainer::new(TrainOpts {
            smoothing,
            ..Default::default()
        })
        .expect("invalid options");
        c.bench_function(&format!("train/{smoothing}"), |b| {
            b.iter(|| trainer.train(black_box(&ds)).expect("failed to train"))
        });
    }
}

criterion_group! {
    name = benchmarks;
    config = Criterion::default().measurement_time(Duration::from_secs(10));
    targets = train_benchmark
}
criterion_main!(benchmarks);
