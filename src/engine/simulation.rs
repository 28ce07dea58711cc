// src/engine/simulation.rs
use serde::Serialize;

use crate::config::SignalConfig;
use crate::control_system::{
    AdaptivePhase, DebugSummary, PhaseTransition, SignalController, SignalMode, SignalPhase,
};
use crate::detection::DetectionField;
use crate::shared_data::{DemandSnapshot, Pair, SignalLights};
use crate::simulation_engine::geometry::{CrossroadGeometry, Point};
use crate::simulation_engine::vehicles::TrackedVehicle;

/// Everything observable after one tick.
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub clock_ms: u64,
    pub mode: SignalMode,
    pub lights: SignalLights,
    pub demand: DemandSnapshot,
    pub transition: Option<PhaseTransition>,
    pub summary: DebugSummary,
}

/// Wires the detection field and the signal controller together, once per tick.
pub struct IntersectionSim {
    config: SignalConfig,
    detection: DetectionField<CrossroadGeometry>,
    controller: SignalController,
    clock_ms: u64,
}

impl IntersectionSim {
    pub fn new(center: Point, mode: SignalMode, config: SignalConfig) -> Self {
        let geometry = CrossroadGeometry::new(center, config.road_width);
        Self {
            detection: DetectionField::new(geometry, config.zone_depth),
            controller: SignalController::new(mode, &config),
            config,
            clock_ms: 0,
        }
    }

    /// Applies new settings and restarts the current mode with them.
    pub fn reconfigure(&mut self, config: SignalConfig) {
        let geometry = CrossroadGeometry::new(self.detection.geometry().center, config.road_width);
        self.detection = DetectionField::new(geometry, config.zone_depth);
        self.controller.enter_mode(self.controller.mode(), &config);
        self.config = config;
    }

    /// Runs one tick: detection first, then scoring, then the phase state machine.
    pub fn tick<V: TrackedVehicle>(
        &mut self,
        elapsed_ms: u64,
        vehicles: &[V],
        mode: SignalMode,
    ) -> TickReport {
        self.clock_ms = self.clock_ms.saturating_add(elapsed_ms);

        if mode != self.controller.mode() {
            log::info!(
                "Switching from {} to {} mode at {} ms",
                self.controller.mode(),
                mode,
                self.clock_ms
            );
            self.controller.enter_mode(mode, &self.config);
            self.detection.configure(self.config.zone_depth);
        }

        let lights = self.controller.current_light_colors();
        self.detection.update(vehicles, Some(&lights), self.clock_ms);
        let demand = self.detection.demand_snapshot();
        self.controller.update_adaptive_logic(Some(&demand));

        let transition = self.controller.update(elapsed_ms);
        if let Some(transition) = &transition {
            self.on_transition(transition);
        }

        TickReport {
            clock_ms: self.clock_ms,
            mode: self.controller.mode(),
            lights: self.controller.current_light_colors(),
            demand: self.detection.demand_snapshot(),
            transition,
            summary: self.controller.debug_summary(),
        }
    }

    // A pair that turns green is being served, so its wait clocks restart.
    // Arrival counts are only zeroed on hand-off when configured to.
    fn on_transition(&mut self, transition: &PhaseTransition) {
        let served = match transition.to {
            SignalPhase::Adaptive(AdaptivePhase::Green(pair)) => Some(pair),
            SignalPhase::Fixed { index: 0 } => Some(Pair::NorthSouth),
            SignalPhase::Fixed { index: 3 } => Some(Pair::WestEast),
            _ => None,
        };
        if let Some(pair) = served {
            for direction in pair.directions() {
                self.detection.clear_wait(direction);
            }
        }
        if let SignalPhase::Adaptive(AdaptivePhase::AllRed(pair)) = transition.from {
            if self.config.reset_arrivals_on_handoff {
                self.reset_arrivals(pair);
            }
        }
    }

    /// Starts a fresh demand window for both directions of `pair`.
    pub fn reset_arrivals(&mut self, pair: Pair) {
        for direction in pair.directions() {
            self.detection.reset(direction);
        }
        log::debug!("Arrival counts reset for {}", pair);
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    pub fn detection(&self) -> &DetectionField<CrossroadGeometry> {
        &self.detection
    }

    pub fn controller(&self) -> &SignalController {
        &self.controller
    }

    pub fn current_light_colors(&self) -> SignalLights {
        self.controller.current_light_colors()
    }
}
