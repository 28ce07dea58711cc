// src/bin/signal_sim_main.rs
use intersection_signals::config::SignalConfig;
use intersection_signals::control_system::SignalMode;
use intersection_signals::engine::IntersectionSim;
use intersection_signals::monitoring::TickRecorder;
use intersection_signals::simulation_engine::traffic::DemoTraffic;
use std::process::ExitCode;
use tokio::time::{interval, Duration};

const CANVAS_WIDTH: f64 = 800.0;
const CANVAS_HEIGHT: f64 = 600.0;
const TICK_MS: u64 = 100;

struct Args {
    config_path: Option<String>,
    mode: SignalMode,
    csv_path: Option<String>,
    ticks: u64,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config_path: None,
        mode: SignalMode::Fixed,
        csv_path: None,
        ticks: 1200,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--adaptive" => args.mode = SignalMode::Adaptive,
            "--csv" => args.csv_path = Some(iter.next().ok_or("--csv needs a path")?),
            "--ticks" => {
                let value = iter.next().ok_or("--ticks needs a number")?;
                args.ticks = value
                    .parse()
                    .map_err(|e| format!("invalid --ticks {}: {}", value, e))?;
            }
            other if args.config_path.is_none() && !other.starts_with("--") => {
                args.config_path = Some(other.to_string())
            }
            other => return Err(format!("unexpected argument {}", other)),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("usage: signal_sim_main [config.json] [--adaptive] [--csv out.csv] [--ticks N]");
            return ExitCode::FAILURE;
        }
    };

    let config = match &args.config_path {
        Some(path) => match SignalConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => SignalConfig::default(),
    };

    let mut recorder = match args.csv_path.as_deref().map(|p| TickRecorder::open(p)).transpose() {
        Ok(recorder) => recorder,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut traffic = DemoTraffic::new(CANVAS_WIDTH, CANVAS_HEIGHT, config.road_width, 1.5, 42);
    let mut sim = IntersectionSim::new(traffic.geometry.center, args.mode, config);
    log::info!("Running {} ticks in {} mode", args.ticks, args.mode);

    // Ten times faster than real time.
    let mut ticker = interval(Duration::from_millis(TICK_MS / 10));
    for _ in 0..args.ticks {
        ticker.tick().await;

        let lights = sim.current_light_colors();
        traffic.step(TICK_MS, &lights);
        let report = sim.tick(TICK_MS, &traffic.vehicles, args.mode);

        if let Some(transition) = &report.transition {
            log::info!("{} ms: {} -> {}", transition.at_ms, transition.from, transition.to);
        }
        if report.clock_ms % 10_000 == 0 {
            println!("{} ms {}", report.clock_ms, report.summary);
        }
        if let Some(recorder) = recorder.as_mut() {
            if let Err(e) = recorder.record(&report) {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    if let Some(recorder) = recorder.as_mut() {
        if let Err(e) = recorder.flush() {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
