// src/detection/mod.rs
pub mod detection_field;

pub use detection_field::DetectionField;
