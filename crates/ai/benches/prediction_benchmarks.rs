use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use foodwise_ai::{ExpiryModel, RuleCascadeModel};
use foodwise_core::{FoodAttributes, FoodCategory, Packaging};

fn sample_attributes(count: usize) -> Vec<FoodAttributes> {
    let names = ["Milk", "Cottage Cheese", "Baby Spinach", "Sourdough Bread", "Chicken", "Apple"];
    let packagings = Packaging::KNOWN;

    (0..count)
        .map(|i| {
            FoodAttributes::new(
                names[i % names.len()],
                FoodCategory::ALL[i % FoodCategory::ALL.len()],
                -10.0 + (i % 50) as f64,
                (i % 101) as f64,
                packagings[i % packagings.len()],
            )
        })
        .collect()
}

fn bench_single_prediction(c: &mut Criterion) {
    let model = RuleCascadeModel::new();
    let attrs = FoodAttributes::new("Milk", FoodCategory::Dairy, 4.0, 40.0, Packaging::Plastic);

    c.bench_function("predict_single", |b| {
        b.iter(|| model.predict(black_box(&attrs)));
    });

    c.bench_function("explain_single", |b| {
        b.iter(|| model.explain(black_box(&attrs)));
    });
}

fn bench_batch_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict_batch");
    let model = RuleCascadeModel::new();

    for count in [10, 100, 1000].iter() {
        let batch = sample_attributes(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("rule_cascade", count), &batch, |b, batch| {
            b.iter(|| {
                batch
                    .iter()
                    .map(|a| model.predict(black_box(a)).days)
                    .sum::<f64>()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_prediction, bench_batch_prediction);
criterion_main!(benches);
