use intersection_signals::config::SignalConfig;
use intersection_signals::control_system::{
    AdaptivePhase, SignalController, SignalMode, SignalPhase,
};
use intersection_signals::detection::DetectionField;
use intersection_signals::engine::IntersectionSim;
use intersection_signals::shared_data::{
    DemandSnapshot, DetectionRecord, Direction, LightColor, Pair, SignalLights,
};
use intersection_signals::simulation_engine::geometry::{CrossroadGeometry, Point};
use intersection_signals::simulation_engine::traffic::DemoTraffic;
use intersection_signals::simulation_engine::vehicles::{Vehicle, VehicleType};

fn config() -> SignalConfig {
    SignalConfig {
        green_duration_ms: 5000,
        yellow_duration_ms: 2000,
        ..SignalConfig::default()
    }
}

fn record(cars_waiting: u32, wait_time_ms: u64, total_arrivals: u64) -> DetectionRecord {
    DetectionRecord {
        cars_waiting,
        wait_time_ms,
        total_arrivals,
        first_wait_start_ms: None,
    }
}

fn adaptive_phase(controller: &SignalController) -> AdaptivePhase {
    match controller.phase() {
        SignalPhase::Adaptive(phase) => phase,
        other => panic!("expected an adaptive phase, got {:?}", other),
    }
}

/// Drives an adaptive controller into Green(WestEast).
fn armed_west_east() -> SignalController {
    let mut controller = SignalController::new(SignalMode::Adaptive, &config());
    let mut demand = DemandSnapshot::new();
    demand.insert(Direction::West, record(1, 0, 1));
    controller.update_adaptive_logic(Some(&demand));
    controller.update(0);
    assert_eq!(adaptive_phase(&controller), AdaptivePhase::Green(Pair::WestEast));
    controller
}

#[test]
fn arbitration_example_arms_west_east() {
    let mut controller = SignalController::new(SignalMode::Adaptive, &config());
    let mut demand = DemandSnapshot::new();
    demand.insert(Direction::West, record(3, 4000, 5));
    demand.insert(Direction::East, record(0, 0, 0));
    demand.insert(Direction::North, record(0, 0, 1));
    demand.insert(Direction::South, record(0, 0, 0));
    controller.update_adaptive_logic(Some(&demand));

    let scores = controller.debug_summary().scores.unwrap();
    assert_eq!(scores.west_east, 17.0);
    assert_eq!(scores.north_south, 1.0);

    controller.update(100);
    assert_eq!(adaptive_phase(&controller), AdaptivePhase::Green(Pair::WestEast));
}

#[test]
fn fixed_cycle_timing() {
    let mut controller = SignalController::new(SignalMode::Fixed, &config());
    controller.update(5000);
    let state = controller.fixed_state().unwrap();
    assert_eq!(state.phase_index, 1);
    assert_eq!(state.phase_timer_ms, 0);

    for elapsed in [2000, 3000, 5000, 2000, 3000] {
        assert!(controller.update(elapsed).is_some());
    }
    assert_eq!(controller.fixed_state().unwrap().phase_index, 0);
}

#[test]
fn green_yields_only_to_a_strictly_higher_score() {
    let mut controller = armed_west_east();
    let mut demand = DemandSnapshot::new();
    demand.insert(Direction::West, record(0, 0, 2));
    demand.insert(Direction::North, record(1, 1000, 1));
    controller.update_adaptive_logic(Some(&demand));
    assert!(controller.update(3000).is_none());
    assert_eq!(adaptive_phase(&controller), AdaptivePhase::Green(Pair::WestEast));
    assert_eq!(controller.phase_timer_ms(), 0);

    demand.insert(Direction::North, record(2, 1000, 1));
    controller.update_adaptive_logic(Some(&demand));
    controller.update(3000);
    assert_eq!(adaptive_phase(&controller), AdaptivePhase::Yellow(Pair::WestEast));
}

#[test]
fn clearance_always_hands_over_to_the_other_pair() {
    let mut controller = armed_west_east();
    let mut demand = DemandSnapshot::new();
    demand.insert(Direction::South, record(4, 5000, 3));
    controller.update_adaptive_logic(Some(&demand));

    let mut seen = vec![adaptive_phase(&controller)];
    for _ in 0..200 {
        if controller.update(100).is_some() {
            seen.push(adaptive_phase(&controller));
        }
        if seen.len() == 4 {
            break;
        }
    }
    assert_eq!(
        seen,
        vec![
            AdaptivePhase::Green(Pair::WestEast),
            AdaptivePhase::Yellow(Pair::WestEast),
            AdaptivePhase::AllRed(Pair::WestEast),
            AdaptivePhase::Green(Pair::NorthSouth),
        ]
    );
}

#[test]
fn all_red_clearance_lasts_exactly_1500_ms() {
    let mut controller = armed_west_east();
    let mut demand = DemandSnapshot::new();
    demand.insert(Direction::North, record(1, 9000, 0));
    controller.update_adaptive_logic(Some(&demand));
    controller.update(3000);
    controller.update(2000);
    assert_eq!(adaptive_phase(&controller), AdaptivePhase::AllRed(Pair::WestEast));

    let transition = controller.update(1500).unwrap();
    assert_eq!(
        transition.to,
        SignalPhase::Adaptive(AdaptivePhase::Green(Pair::NorthSouth))
    );
}

#[test]
fn repeated_updates_do_not_recount_a_parked_vehicle() {
    let geometry = CrossroadGeometry::new(Point::new(400.0, 300.0), 80.0);
    let mut field = DetectionField::new(geometry, 120.0);
    let mut vehicle = Vehicle::new(1, VehicleType::Bus, Direction::South, Point::new(410.0, 345.0), 60.0);
    vehicle.stopped = true;
    let vehicles = vec![vehicle];
    let lights = SignalLights::for_pair(Pair::WestEast, LightColor::Green);

    for tick in 1..=50 {
        field.update(&vehicles, Some(&lights), tick * 100);
    }
    let record = field.record(Direction::South);
    assert_eq!(record.total_arrivals, 1);
    assert_eq!(record.cars_waiting, 1);
    assert_eq!(record.first_wait_start_ms, Some(100));
    assert_eq!(record.wait_time_ms, 4900);
}

fn check_lights(mode: SignalMode, lights: &SignalLights, phase: SignalPhase) {
    for pair in [Pair::WestEast, Pair::NorthSouth] {
        let [a, b] = pair.directions();
        assert_eq!(lights.get(a), lights.get(b), "{:?} split in {:?}", pair, phase);
    }
    let ns_active = lights.get(Direction::North) != LightColor::Red;
    let we_active = lights.get(Direction::West) != LightColor::Red;
    assert!(!(ns_active && we_active), "both pairs active in {:?}", phase);

    if let (SignalMode::Adaptive, SignalPhase::Adaptive(adaptive)) = (mode, phase) {
        match adaptive.active_pair() {
            Some(pair) => {
                for direction in pair.other().directions() {
                    assert_eq!(lights.get(direction), LightColor::Red);
                }
            }
            None => assert!(lights.is_all_red()),
        }
    }
}

#[test]
fn random_traffic_never_breaks_light_or_arrival_invariants() {
    for mode in [SignalMode::Fixed, SignalMode::Adaptive] {
        let config = config();
        let mut traffic = DemoTraffic::new(800.0, 600.0, config.road_width, 2.0, 1234);
        let mut sim = IntersectionSim::new(traffic.geometry.center, mode, config);
        let mut last_arrivals = [0u64; 4];
        let mut transitions = 0;

        for _ in 0..3000 {
            let lights = sim.current_light_colors();
            traffic.step(100, &lights);
            let report = sim.tick(100, &traffic.vehicles, mode);
            check_lights(mode, &report.lights, sim.controller().phase());

            for direction in Direction::ALL {
                let arrivals = report.demand[&direction].total_arrivals;
                assert!(arrivals >= last_arrivals[direction.index()]);
                last_arrivals[direction.index()] = arrivals;
            }
            if report.transition.is_some() {
                transitions += 1;
            }
        }
        assert!(transitions > 0, "{} mode never changed phase", mode);
    }
}
