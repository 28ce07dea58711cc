// src/engine/mod.rs
pub mod simulation;

pub use simulation::{IntersectionSim, TickReport};
