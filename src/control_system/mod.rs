// src/control_system/mod.rs
pub mod adaptive;
pub mod fixed_cycle;
pub mod traffic_light_controller;

use crate::config::SignalConfig;

pub use adaptive::{AdaptivePhase, AdaptiveState, PriorityScores};
pub use fixed_cycle::FixedPhaseState;
pub use traffic_light_controller::{
    DebugSummary, PhaseTransition, SignalController, SignalMode, SignalPhase,
};

/// Configurable phase durations shared by both strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTimings {
    pub green_ms: u64,
    pub yellow_ms: u64,
}

impl From<&SignalConfig> for PhaseTimings {
    fn from(config: &SignalConfig) -> Self {
        Self {
            green_ms: config.green_duration_ms,
            yellow_ms: config.yellow_duration_ms,
        }
    }
}
