use criterion::{black_box, criterion_group, criterion_main, Criterion};
use garaged::maintenance::{upcoming_maintenance, ServiceRecord};

fn bench_planner(c: &mut Criterion) {
    let history = vec![
        ServiceRecord {
            service_type: "oil_change".to_string(),
            mileage: 45_000,
        },
        ServiceRecord {
            service_type: "tire_rotation".to_string(),
            mileage: 42_000,
        },
        ServiceRecord {
            service_type: "brake_inspection".to_string(),
            mileage: 30_000,
        },
    ];

    c.bench_function("upcoming_maintenance", |b| {
        b.iter(|| upcoming_maintenance(black_box(47_000), black_box(&history)))
    });

    c.bench_function("upcoming_maintenance_empty_history", |b| {
        b.iter(|| upcoming_maintenance(black_box(5000), black_box(&[])))
    });
}

criterion_group!(benches, bench_planner);
criterion_main!(benches);
