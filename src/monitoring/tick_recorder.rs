// src/monitoring/tick_recorder.rs
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::Path;
use thiserror::Error;

use crate::control_system::SignalMode;
use crate::engine::simulation::TickReport;
use crate::shared_data::{Direction, LightColor};

#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("failed to open tick log: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write tick row: {0}")]
    Csv(#[from] csv::Error),
}

/// One flattened CSV row per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRow {
    pub clock_ms: u64,
    pub mode: SignalMode,
    pub phase: String,
    pub north_light: LightColor,
    pub south_light: LightColor,
    pub east_light: LightColor,
    pub west_light: LightColor,
    pub north_waiting: u32,
    pub south_waiting: u32,
    pub east_waiting: u32,
    pub west_waiting: u32,
    pub north_arrivals: u64,
    pub south_arrivals: u64,
    pub east_arrivals: u64,
    pub west_arrivals: u64,
    pub score_we: Option<f64>,
    pub score_ns: Option<f64>,
}

impl From<&TickReport> for TickRow {
    fn from(report: &TickReport) -> Self {
        let waiting = |d: Direction| report.demand.get(&d).map_or(0, |r| r.cars_waiting);
        let arrivals = |d: Direction| report.demand.get(&d).map_or(0, |r| r.total_arrivals);
        let scores = report.summary.scores;
        Self {
            clock_ms: report.clock_ms,
            mode: report.mode,
            phase: report.summary.phase.clone(),
            north_light: report.lights.get(Direction::North),
            south_light: report.lights.get(Direction::South),
            east_light: report.lights.get(Direction::East),
            west_light: report.lights.get(Direction::West),
            north_waiting: waiting(Direction::North),
            south_waiting: waiting(Direction::South),
            east_waiting: waiting(Direction::East),
            west_waiting: waiting(Direction::West),
            north_arrivals: arrivals(Direction::North),
            south_arrivals: arrivals(Direction::South),
            east_arrivals: arrivals(Direction::East),
            west_arrivals: arrivals(Direction::West),
            score_we: scores.map(|s| s.west_east),
            score_ns: scores.map(|s| s.north_south),
        }
    }
}

/// Appends tick rows to a CSV file. Headers are written only for new files.
pub struct TickRecorder {
    writer: csv::Writer<File>,
}

impl TickRecorder {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecorderError> {
        let path = path.as_ref();
        let file_exists = path.exists() && path.metadata()?.len() > 0;
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        let writer = csv::WriterBuilder::new()
            .has_headers(!file_exists)
            .from_writer(file);
        Ok(Self { writer })
    }

    pub fn record(&mut self, report: &TickReport) -> Result<(), RecorderError> {
        self.writer.serialize(TickRow::from(report))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), RecorderError> {
        self.writer.flush()?;
        Ok(())
    }
}

// Reads back every row of a tick log.
pub fn read_tick_rows(path: impl AsRef<Path>) -> Result<Vec<TickRow>, RecorderError> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}
