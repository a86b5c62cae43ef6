use criterion::{criterion_group, criterion_main, Criterion};

use helios_kcode::config::bare_sphere_scenario;
use helios_kcode::cycle::{CycleController, CycleType};
use helios_kcode::driver::{Driver, SchedulerPolicy};

fn bare_sphere_cycle(c: &mut Criterion) {
    let (world, source) = bare_sphere_scenario(12.0, 400.0, 1.0).unwrap();
    let driver = Driver::new(SchedulerPolicy::Rayon);

    c.bench_function("bare_sphere_active_cycle_1000p", |b| {
        b.iter_batched(
            || CycleController::new(&world, &source, 10, 100_000, 100, 1000).unwrap(),
            |mut controller| {
                controller.run_cycle(&world, &driver, CycleType::Active).unwrap();
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, bare_sphere_cycle);
criterion_main!(benches);
