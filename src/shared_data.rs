// src/shared_data.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Side of the intersection a vehicle approaches from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    pub fn pair(self) -> Pair {
        match self {
            Direction::North | Direction::South => Pair::NorthSouth,
            Direction::East | Direction::West => Pair::WestEast,
        }
    }
}

/// Two opposite approaches that always share a light color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pair {
    WestEast,
    NorthSouth,
}

impl Pair {
    pub fn directions(self) -> [Direction; 2] {
        match self {
            Pair::WestEast => [Direction::West, Direction::East],
            Pair::NorthSouth => [Direction::North, Direction::South],
        }
    }

    pub fn other(self) -> Pair {
        match self {
            Pair::WestEast => Pair::NorthSouth,
            Pair::NorthSouth => Pair::WestEast,
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pair::WestEast => write!(f, "WE"),
            Pair::NorthSouth => write!(f, "NS"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightColor {
    Green,
    Yellow,
    Red,
}

/// The four light colors, one per approach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalLights([LightColor; 4]);

impl SignalLights {
    pub fn all_red() -> Self {
        Self([LightColor::Red; 4])
    }

    /// Both directions of `pair` show `color`, the other pair stays red.
    pub fn for_pair(pair: Pair, color: LightColor) -> Self {
        let mut lights = Self::all_red();
        for direction in pair.directions() {
            lights.set(direction, color);
        }
        lights
    }

    pub fn get(&self, direction: Direction) -> LightColor {
        self.0[direction.index()]
    }

    pub fn set(&mut self, direction: Direction, color: LightColor) {
        self.0[direction.index()] = color;
    }

    pub fn is_all_red(&self) -> bool {
        self.0.iter().all(|c| *c == LightColor::Red)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, LightColor)> + '_ {
        Direction::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}

/// Demand measured for one approach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// Stationary vehicles in the zone this tick while the light is red.
    pub cars_waiting: u32,
    /// Time since the queue reached the stop line during the current red interval.
    pub wait_time_ms: u64,
    /// Distinct zone entries since the last reset.
    pub total_arrivals: u64,
    pub first_wait_start_ms: Option<u64>,
}

impl DetectionRecord {
    /// Contribution of this approach to its pair's priority score.
    pub fn demand_score(&self) -> f64 {
        self.cars_waiting as f64 * (self.wait_time_ms as f64 / 1000.0) + self.total_arrivals as f64
    }
}

pub type DemandSnapshot = BTreeMap<Direction, DetectionRecord>;
