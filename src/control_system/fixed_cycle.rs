// src/control_system/fixed_cycle.rs
use crate::global_variables::FIXED_ALL_RED_MS;
use crate::shared_data::{LightColor, Pair, SignalLights};

use super::PhaseTimings;

pub const FIXED_PHASE_COUNT: usize = 6;

/// Round-robin cycle: NS green, NS yellow, all red, WE green, WE yellow, all red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedPhaseState {
    pub phase_index: usize,
    pub phase_timer_ms: u64,
}

impl FixedPhaseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase_duration(&self, timings: &PhaseTimings) -> u64 {
        match self.phase_index {
            0 | 3 => timings.green_ms,
            1 | 4 => timings.yellow_ms,
            _ => FIXED_ALL_RED_MS,
        }
    }

    pub fn lights(&self) -> SignalLights {
        match self.phase_index {
            0 => SignalLights::for_pair(Pair::NorthSouth, LightColor::Green),
            1 => SignalLights::for_pair(Pair::NorthSouth, LightColor::Yellow),
            3 => SignalLights::for_pair(Pair::WestEast, LightColor::Green),
            4 => SignalLights::for_pair(Pair::WestEast, LightColor::Yellow),
            _ => SignalLights::all_red(),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self.phase_index {
            0 => "NS green",
            1 => "NS yellow",
            2 => "all red (NS side)",
            3 => "WE green",
            4 => "WE yellow",
            _ => "all red (WE side)",
        }
    }

    // Increases the elapsed time and cycles the phase if the current phase's duration is reached.
    // Returns the previous phase index on a transition.
    pub fn advance(&mut self, elapsed_ms: u64, timings: &PhaseTimings) -> Option<usize> {
        self.phase_timer_ms = self.phase_timer_ms.saturating_add(elapsed_ms);
        if self.phase_timer_ms < self.phase_duration(timings) {
            return None;
        }
        let previous = self.phase_index;
        self.phase_timer_ms = 0;
        self.phase_index = (self.phase_index + 1) % FIXED_PHASE_COUNT;
        Some(previous)
    }
}
