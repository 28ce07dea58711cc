// src/global_variables.rs
// Fixed-cycle all-red interval after each yellow
pub const FIXED_ALL_RED_MS: u64 = 3000;

// Adaptive all-red clearance before the other pair turns green
pub const ADAPTIVE_CLEARANCE_MS: u64 = 1500;

// How often a green pair is re-evaluated against the waiting pair
pub const ADAPTIVE_EVALUATION_WINDOW_MS: u64 = 3000;

// Distance from the stop line at which a stopped vehicle starts the wait clock
pub const STOP_LINE_TOLERANCE: f64 = 10.0;

// Config defaults
pub const DEFAULT_GREEN_DURATION_MS: u64 = 5000;
pub const DEFAULT_YELLOW_DURATION_MS: u64 = 2000;
pub const DEFAULT_ZONE_DEPTH: f64 = 120.0;
pub const DEFAULT_ROAD_WIDTH: f64 = 80.0;
