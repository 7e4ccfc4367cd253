use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use robot_hunt::core::SimulationConfig;
use robot_hunt::simulation::Simulation;

fn bench_turns(c: &mut Criterion) {
    let mut group = c.benchmark_group("turns");

    for &size in &[8_u32, 16, 32] {
        group.bench_function(format!("size{}_turns50", size), |b| {
            b.iter_batched(
                || {
                    let mut config = SimulationConfig::default();
                    config.world.size = size;
                    config.world.seed = Some(0xBEEF);
                    config.population.robots = size;
                    config.population.monsters = size * 2;
                    Simulation::new(config).expect("valid bench config")
                },
                |mut sim| {
                    for turn in 0..50 {
                        sim.advance(turn);
                    }
                    sim
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_turns);
criterion_main!(benches);
