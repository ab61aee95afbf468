use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::{Duration, Utc};
use foodwise_core::{FoodCategory, Packaging};
use foodwise_events::{InMemoryChangeBus, InventoryChange};
use foodwise_infra::store::{InMemoryBackend, InventoryStore};
use foodwise_inventory::{NewFoodItem, NotificationThresholds, derive_notifications};

type BenchStore = InventoryStore<InMemoryBackend, InMemoryChangeBus<InventoryChange>>;

fn item(i: usize) -> NewFoodItem {
    NewFoodItem {
        name: format!("item-{i}"),
        category: FoodCategory::ALL[i % FoodCategory::ALL.len()],
        expiry_date: Utc::now() + Duration::hours((i % 240) as i64 - 24),
        expiry_days: (i % 10) as f64,
        temperature: 4.0,
        humidity: 50.0,
        packaging: Packaging::Plastic,
    }
}

fn seeded_store(count: usize) -> BenchStore {
    let store = InventoryStore::new(InMemoryBackend::new(), InMemoryChangeBus::new());
    for i in 0..count {
        store.save(item(i)).unwrap();
    }
    store
}

/// Every save rewrites the whole collection, so cost grows with its size.
fn bench_save_into_collection(c: &mut Criterion) {
    let mut group = c.benchmark_group("save_into_collection");
    group.throughput(Throughput::Elements(1));

    for size in [0, 10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter_batched(
                || seeded_store(size),
                |store| store.save(black_box(item(size))).unwrap(),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_expiring_and_notifications(c: &mut Criterion) {
    let mut group = c.benchmark_group("expiring_and_notifications");

    for size in [10, 100, 1000].iter() {
        let store = seeded_store(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let now = Utc::now();
                let expiring = store.expiring_soon_at(3, now);
                derive_notifications(black_box(&expiring), now, &NotificationThresholds::default())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_save_into_collection, bench_expiring_and_notifications);
criterion_main!(benches);
