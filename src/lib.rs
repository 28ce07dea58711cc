// src/lib.rs
//! Signal control for a single four-way intersection.
//!
//! [`detection::DetectionField`] turns vehicle positions into per-approach
//! demand, and [`control_system::SignalController`] runs either a fixed cycle
//! or a demand-adaptive scheduler over the two perpendicular pairs.
//! [`engine::IntersectionSim`] wires both together once per tick.

pub mod config;
pub mod control_system;
pub mod detection;
pub mod engine;
pub mod global_variables;
pub mod monitoring;
pub mod shared_data;
pub mod simulation_engine;
