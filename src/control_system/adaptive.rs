// src/control_system/adaptive.rs
use serde::Serialize;
use std::fmt;

use crate::global_variables::{ADAPTIVE_CLEARANCE_MS, ADAPTIVE_EVALUATION_WINDOW_MS};
use crate::shared_data::{DemandSnapshot, LightColor, Pair, SignalLights};

use super::PhaseTimings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdaptivePhase {
    /// No demand seen yet; every light is red.
    Unarmed,
    Green(Pair),
    Yellow(Pair),
    AllRed(Pair),
}

impl AdaptivePhase {
    pub fn active_pair(&self) -> Option<Pair> {
        match *self {
            AdaptivePhase::Unarmed => None,
            AdaptivePhase::Green(pair) | AdaptivePhase::Yellow(pair) | AdaptivePhase::AllRed(pair) => {
                Some(pair)
            }
        }
    }

    pub fn lights(&self) -> SignalLights {
        match *self {
            AdaptivePhase::Unarmed => SignalLights::all_red(),
            AdaptivePhase::Green(pair) => SignalLights::for_pair(pair, LightColor::Green),
            AdaptivePhase::Yellow(pair) => SignalLights::for_pair(pair, LightColor::Yellow),
            AdaptivePhase::AllRed(pair) => SignalLights::for_pair(pair, LightColor::Red),
        }
    }
}

impl fmt::Display for AdaptivePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdaptivePhase::Unarmed => write!(f, "unarmed"),
            AdaptivePhase::Green(pair) => write!(f, "{} green", pair),
            AdaptivePhase::Yellow(pair) => write!(f, "{} yellow", pair),
            AdaptivePhase::AllRed(pair) => write!(f, "{} all red", pair),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PriorityScores {
    pub west_east: f64,
    pub north_south: f64,
}

impl PriorityScores {
    /// Sums each pair's demand. Missing directions count as zero demand.
    pub fn from_demand(demand: Option<&DemandSnapshot>) -> Self {
        let Some(demand) = demand else {
            return Self::default();
        };
        let pair_score = |pair: Pair| -> f64 {
            pair.directions()
                .iter()
                .filter_map(|d| demand.get(d))
                .fold(0.0, |acc, record| acc + record.demand_score())
        };
        Self {
            west_east: pair_score(Pair::WestEast),
            north_south: pair_score(Pair::NorthSouth),
        }
    }

    pub fn get(&self, pair: Pair) -> f64 {
        match pair {
            Pair::WestEast => self.west_east,
            Pair::NorthSouth => self.north_south,
        }
    }
}

/// Demand-driven scheduler over the two perpendicular pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveState {
    pub phase: AdaptivePhase,
    pub phase_timer_ms: u64,
    pub scores: PriorityScores,
    pub last_switch_ms: u64,
}

impl Default for AdaptiveState {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveState {
    pub fn new() -> Self {
        Self {
            phase: AdaptivePhase::Unarmed,
            phase_timer_ms: 0,
            scores: PriorityScores::default(),
            last_switch_ms: 0,
        }
    }

    pub fn active_pair(&self) -> Option<Pair> {
        self.phase.active_pair()
    }

    pub fn rescore(&mut self, demand: Option<&DemandSnapshot>) {
        self.scores = PriorityScores::from_demand(demand);
        log::trace!(
            "Scores: WE {:.2}, NS {:.2}",
            self.scores.west_east,
            self.scores.north_south
        );
    }

    /// Runs one step of the scheduler. Returns the phase left behind on a transition.
    pub fn advance(
        &mut self,
        elapsed_ms: u64,
        timings: &PhaseTimings,
        clock_ms: u64,
    ) -> Option<AdaptivePhase> {
        let previous = self.phase;
        let next = match self.phase {
            AdaptivePhase::Unarmed => {
                // WestEast wins a same-tick tie.
                if self.scores.west_east > 0.0 {
                    Some(AdaptivePhase::Green(Pair::WestEast))
                } else if self.scores.north_south > 0.0 {
                    Some(AdaptivePhase::Green(Pair::NorthSouth))
                } else {
                    None
                }
            }
            AdaptivePhase::Green(pair) => {
                self.phase_timer_ms = self.phase_timer_ms.saturating_add(elapsed_ms);
                if self.phase_timer_ms < ADAPTIVE_EVALUATION_WINDOW_MS {
                    None
                } else if self.scores.get(pair.other()) > self.scores.get(pair) {
                    Some(AdaptivePhase::Yellow(pair))
                } else {
                    log::trace!(
                        "{} keeps green ({:.2} vs {:.2})",
                        pair,
                        self.scores.get(pair),
                        self.scores.get(pair.other())
                    );
                    self.phase_timer_ms = 0;
                    None
                }
            }
            AdaptivePhase::Yellow(pair) => {
                self.phase_timer_ms = self.phase_timer_ms.saturating_add(elapsed_ms);
                (self.phase_timer_ms >= timings.yellow_ms).then_some(AdaptivePhase::AllRed(pair))
            }
            AdaptivePhase::AllRed(pair) => {
                self.phase_timer_ms = self.phase_timer_ms.saturating_add(elapsed_ms);
                (self.phase_timer_ms >= ADAPTIVE_CLEARANCE_MS)
                    .then_some(AdaptivePhase::Green(pair.other()))
            }
        }?;

        self.phase = next;
        self.phase_timer_ms = 0;
        if let AdaptivePhase::Green(_) = next {
            self.last_switch_ms = clock_ms;
        }
        Some(previous)
    }
}
