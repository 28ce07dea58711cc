// src/control_system/traffic_light_controller.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::SignalConfig;
use crate::shared_data::{DemandSnapshot, SignalLights};

use super::adaptive::{AdaptivePhase, AdaptiveState, PriorityScores};
use super::fixed_cycle::FixedPhaseState;
use super::PhaseTimings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalMode {
    Fixed,
    Adaptive,
}

impl fmt::Display for SignalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalMode::Fixed => write!(f, "fixed"),
            SignalMode::Adaptive => write!(f, "adaptive"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignalPhase {
    Fixed { index: usize },
    Adaptive(AdaptivePhase),
}

impl fmt::Display for SignalPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalPhase::Fixed { index } => write!(f, "phase {}", index),
            SignalPhase::Adaptive(phase) => write!(f, "{}", phase),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseTransition {
    pub from: SignalPhase,
    pub to: SignalPhase,
    pub at_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugSummary {
    pub mode: SignalMode,
    pub phase: String,
    pub phase_timer_ms: u64,
    pub scores: Option<PriorityScores>,
}

impl fmt::Display for DebugSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({} ms)", self.mode, self.phase, self.phase_timer_ms)?;
        if let Some(scores) = &self.scores {
            write!(f, " WE={:.2} NS={:.2}", scores.west_east, scores.north_south)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Strategy {
    Fixed(FixedPhaseState),
    Adaptive(AdaptiveState),
}

/// Owns the four lights and runs exactly one control strategy at a time.
#[derive(Debug, Clone)]
pub struct SignalController {
    strategy: Strategy,
    timings: PhaseTimings,
    lights: SignalLights,
    clock_ms: u64,
}

impl SignalController {
    pub fn new(mode: SignalMode, config: &SignalConfig) -> Self {
        let mut controller = Self {
            strategy: Strategy::Fixed(FixedPhaseState::new()),
            timings: PhaseTimings::from(config),
            lights: SignalLights::all_red(),
            clock_ms: 0,
        };
        controller.enter_mode(mode, config);
        controller
    }

    /// (Re)initializes `mode` from scratch, discarding the previous strategy state.
    pub fn enter_mode(&mut self, mode: SignalMode, config: &SignalConfig) {
        self.timings = PhaseTimings::from(config);
        self.strategy = match mode {
            SignalMode::Fixed => Strategy::Fixed(FixedPhaseState::new()),
            SignalMode::Adaptive => Strategy::Adaptive(AdaptiveState::new()),
        };
        self.refresh_lights();
        log::info!("Signal controller entered {} mode", mode);
    }

    pub fn mode(&self) -> SignalMode {
        match self.strategy {
            Strategy::Fixed(_) => SignalMode::Fixed,
            Strategy::Adaptive(_) => SignalMode::Adaptive,
        }
    }

    /// Folds the latest demand into the adaptive priority scores.
    pub fn update_adaptive_logic(&mut self, demand: Option<&DemandSnapshot>) {
        if let Strategy::Adaptive(state) = &mut self.strategy {
            state.rescore(demand);
        }
    }

    /// Advances the active strategy by `elapsed_ms`.
    pub fn update(&mut self, elapsed_ms: u64) -> Option<PhaseTransition> {
        self.clock_ms = self.clock_ms.saturating_add(elapsed_ms);
        let from = match &mut self.strategy {
            Strategy::Fixed(state) => {
                let previous = state.advance(elapsed_ms, &self.timings)?;
                SignalPhase::Fixed { index: previous }
            }
            Strategy::Adaptive(state) => {
                let previous = state.advance(elapsed_ms, &self.timings, self.clock_ms)?;
                SignalPhase::Adaptive(previous)
            }
        };
        self.refresh_lights();

        let transition = PhaseTransition {
            from,
            to: self.phase(),
            at_ms: self.clock_ms,
        };
        log::debug!(
            "{} -> {} at {} ms",
            transition.from,
            transition.to,
            transition.at_ms
        );
        Some(transition)
    }

    pub fn current_light_colors(&self) -> SignalLights {
        self.lights
    }

    pub fn phase(&self) -> SignalPhase {
        match &self.strategy {
            Strategy::Fixed(state) => SignalPhase::Fixed {
                index: state.phase_index,
            },
            Strategy::Adaptive(state) => SignalPhase::Adaptive(state.phase),
        }
    }

    pub fn phase_timer_ms(&self) -> u64 {
        match &self.strategy {
            Strategy::Fixed(state) => state.phase_timer_ms,
            Strategy::Adaptive(state) => state.phase_timer_ms,
        }
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn fixed_state(&self) -> Option<&FixedPhaseState> {
        match &self.strategy {
            Strategy::Fixed(state) => Some(state),
            Strategy::Adaptive(_) => None,
        }
    }

    pub fn adaptive_state(&self) -> Option<&AdaptiveState> {
        match &self.strategy {
            Strategy::Adaptive(state) => Some(state),
            Strategy::Fixed(_) => None,
        }
    }

    pub fn debug_summary(&self) -> DebugSummary {
        let phase = match &self.strategy {
            Strategy::Fixed(state) => format!("{} {}", self.phase(), state.describe()),
            Strategy::Adaptive(state) => state.phase.to_string(),
        };
        DebugSummary {
            mode: self.mode(),
            phase,
            phase_timer_ms: self.phase_timer_ms(),
            scores: self.adaptive_state().map(|state| state.scores),
        }
    }

    fn refresh_lights(&mut self) {
        self.lights = match &self.strategy {
            Strategy::Fixed(state) => state.lights(),
            Strategy::Adaptive(state) => state.phase.lights(),
        };
    }
}
