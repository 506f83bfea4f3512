use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tankfield_core::{ArenaConfig, Intent, Simulation};

fn populated(enemy_count: u32) -> Simulation {
    let config = ArenaConfig {
        enemy_count,
        ..ArenaConfig::default().with_seed(1)
    };
    let mut sim = Simulation::new(config).expect("valid config");
    sim.populate().expect("standard assets");
    sim
}

fn bench_idle_tick(c: &mut Criterion) {
    // One enemy wandering, player idle
    let mut sim = populated(1);

    c.bench_function("idle_tick", |b| {
        b.iter(|| {
            sim.step(black_box(1.0 / 60.0));
        })
    });
}

fn bench_busy_tick(c: &mut Criterion) {
    // Crowded map with the player driving in circles and shooting
    let mut sim = populated(8);
    sim.press(Intent::MoveForward);
    sim.press(Intent::TurnLeft);
    let mut frame = 0u32;

    c.bench_function("busy_tick", |b| {
        b.iter(|| {
            if frame % 20 == 0 {
                sim.release(Intent::Fire);
                sim.press(Intent::Fire);
            }
            frame = frame.wrapping_add(1);
            sim.step(black_box(1.0 / 60.0));
        })
    });
}

fn bench_populate(c: &mut Criterion) {
    c.bench_function("populate", |b| b.iter(|| black_box(populated(4))));
}

criterion_group!(benches, bench_idle_tick, bench_busy_tick, bench_populate);
criterion_main!(benches);
