//! Nonce lifecycle benchmarks

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use nonceward::prelude::*;
use std::hint::black_box;
use std::sync::Arc;

fn randomizer_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("randomizer");
    group.throughput(Throughput::Elements(1));

    for length in [16usize, 32, 64] {
        let randomizer = HexRandomizer::new(length).unwrap();
        group.bench_function(format!("hex_{}", length), |b| {
            b.iter(|| black_box(randomizer.randomize()));
        });
    }

    group.finish();
}

fn memory_storage_benchmark(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let manager = NoncesManager::new(MemoryStorage::new());

    let token = rt.block_on(async { manager.create(Some("bench-form"), None).await.unwrap() });

    let mut group = c.benchmark_group("memory_storage");
    group.throughput(Throughput::Elements(1));

    group.bench_function("create", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(manager.create(Some("bench-create"), None).await.unwrap());
        });
    });

    group.bench_function("verify", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(manager.verify("bench-form", token.value()).await.unwrap());
        });
    });

    group.bench_function("create_then_consume", |b| {
        b.to_async(&rt).iter(|| async {
            let token = manager.create(None, None).await.unwrap();
            black_box(
                manager
                    .verify_and_expire(token.name(), token.value())
                    .await
                    .unwrap(),
            );
        });
    });

    group.finish();
}

fn cache_storage_benchmark(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let cache = Arc::new(InMemoryCache::new());
    let manager = NoncesManager::new(CacheStorage::from_arc(cache));

    let token = rt.block_on(async { manager.create(Some("bench-form"), None).await.unwrap() });

    let mut group = c.benchmark_group("cache_storage");
    group.throughput(Throughput::Elements(1));

    group.bench_function("verify", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(manager.verify("bench-form", token.value()).await.unwrap());
        });
    });

    group.bench_function("create_then_consume", |b| {
        b.to_async(&rt).iter(|| async {
            let token = manager.create(None, None).await.unwrap();
            black_box(
                manager
                    .verify_and_expire(token.name(), token.value())
                    .await
                    .unwrap(),
            );
        });
    });

    group.finish();
}

fn form_benchmark(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let session = SharedNonceMap::default();

    let mut group = c.benchmark_group("form");

    group.bench_function("render_and_submit", |b| {
        b.to_async(&rt).iter(|| async {
            let manager = NoncesManager::new(MemoryStorage::with_map(session.clone()));
            let mut form = NonceForm::new("token", manager.clone(), FormInput::new());
            let hidden = form.field_value().await.unwrap();

            let input = FormInput::from_pairs([("token", hidden)]);
            let mut form = NonceForm::new("token", manager, input);
            black_box(form.is_submitted_valid().await.unwrap());
        });
    });

    group.bench_function("parse_urlencoded", |b| {
        let body = b"title=Hello&amount=10&token=nonce-0123456789abcdef%3Aabcdef0123456789";
        b.iter(|| black_box(FormInput::from_urlencoded(black_box(body)).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    randomizer_benchmark,
    memory_storage_benchmark,
    cache_storage_benchmark,
    form_benchmark
);
criterion_main!(benches);
