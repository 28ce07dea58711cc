// benches/bench_signal_controller.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use intersection_signals::config::SignalConfig;
use intersection_signals::control_system::{SignalController, SignalMode};
use intersection_signals::engine::IntersectionSim;
use intersection_signals::simulation_engine::traffic::DemoTraffic;
use std::time::Duration;

fn bench_controller_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("controller_update");
    group.measurement_time(Duration::from_secs(5));

    let config = SignalConfig::default();
    for mode in [SignalMode::Fixed, SignalMode::Adaptive] {
        group.bench_function(format!("{}", mode), |b| {
            let mut controller = SignalController::new(mode, &config);
            b.iter(|| {
                black_box(controller.update(black_box(100)));
            });
        });
    }
    group.finish();
}

fn bench_full_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_tick");
    group.measurement_time(Duration::from_secs(5));

    for mode in [SignalMode::Fixed, SignalMode::Adaptive] {
        group.bench_function(format!("{}", mode), |b| {
            let config = SignalConfig::default();
            let mut traffic = DemoTraffic::new(800.0, 600.0, config.road_width, 3.0, 11);
            let mut sim = IntersectionSim::new(traffic.geometry.center, mode, config);
            b.iter(|| {
                let lights = sim.current_light_colors();
                traffic.step(100, &lights);
                black_box(sim.tick(100, &traffic.vehicles, mode));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_controller_update, bench_full_tick);
criterion_main!(benches);
