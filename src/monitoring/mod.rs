// src/monitoring/mod.rs
pub mod tick_recorder;

pub use tick_recorder::{read_tick_rows, RecorderError, TickRecorder, TickRow};
