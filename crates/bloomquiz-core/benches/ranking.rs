use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bloomquiz_core::leaderboard::{
    normalize_entry, retain_newest, top, LeaderboardEntry, Submission, RETENTION_CAP,
};
use chrono::{Duration, TimeZone, Utc};

fn make_entries(n: usize) -> Vec<LeaderboardEntry> {
    let base = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    (0..n)
        .map(|i| LeaderboardEntry {
            name: format!("player_{i}"),
            score: (i * 7919 % 3000) as u64,
            percent: (i % 101) as f64,
            date: base + Duration::seconds(i as i64),
        })
        .collect()
}

fn bench_top(c: &mut Criterion) {
    let mut group = c.benchmark_group("top");

    for n in [10, 100, RETENTION_CAP] {
        let entries = make_entries(n);
        group.bench_function(format!("{n}_entries"), |b| {
            b.iter(|| top(black_box(entries.clone()), black_box(10)))
        });
    }

    group.finish();
}

fn bench_retention(c: &mut Criterion) {
    let entries = make_entries(RETENTION_CAP + 1);
    c.bench_function("retain_newest_1001", |b| {
        b.iter(|| retain_newest(black_box(entries.clone()), black_box(RETENTION_CAP)))
    });
}

fn bench_normalize(c: &mut Criterion) {
    let now = Utc::now();
    let submission = Submission::new("   Dr. Mariama Diallo, interne en cardiologie   ", 2345.7, 104.0);
    c.bench_function("normalize_entry", |b| {
        b.iter(|| normalize_entry(black_box(&submission), black_box(now)))
    });
}

criterion_group!(benches, bench_top, bench_retention, bench_normalize);
criterion_main!(benches);
