// src/simulation_engine/mod.rs
pub mod geometry;
pub mod traffic;
pub mod vehicles;
