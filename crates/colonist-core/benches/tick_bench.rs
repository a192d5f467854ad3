use colonist_core::components::RoomName;
use colonist_core::engine::SimulationEngine;
use colonist_core::generation::{generate_room, RoomConfig};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// An engine with `rooms` generated rooms, warmed up so workers exist.
fn colony(rooms: u8) -> SimulationEngine {
    let mut engine = SimulationEngine::new();
    let mut rng = StdRng::seed_from_u64(rooms as u64);
    for i in 0..rooms {
        let config = RoomConfig {
            spawn_name: format!("Spawn{}", i + 1),
            ..Default::default()
        };
        let room = RoomName::new(i as i32, 0);
        engine.memory.create_base(&room.to_string(), room);
        generate_room(&mut engine, room, &config, &mut rng);
    }
    engine.run(200);
    engine
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for rooms in [1u8, 4, 8] {
        group.bench_with_input(BenchmarkId::new("rooms", rooms), &rooms, |b, &rooms| {
            b.iter_batched(
                || colony(rooms),
                |mut engine| {
                    engine.update();
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(tick_benches, bench_tick);
criterion_main!(tick_benches);
