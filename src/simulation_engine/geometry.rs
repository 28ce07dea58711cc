// src/simulation_engine/geometry.rs
use crate::shared_data::Direction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle. `EMPTY` contains no point at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 0.0,
        max_y: 0.0,
    };

    pub fn is_empty(&self) -> bool {
        !(self.max_x > self.min_x && self.max_y > self.min_y)
    }

    pub fn contains(&self, p: Point) -> bool {
        !self.is_empty()
            && p.x >= self.min_x
            && p.x <= self.max_x
            && p.y >= self.min_y
            && p.y <= self.max_y
    }
}

/// Time-invariant layout of the crossroad.
///
/// Screen coordinates: `x` grows east, `y` grows south. Stop line positions are
/// measured on the approach axis (`y` for North/South, `x` for East/West).
pub trait IntersectionGeometry {
    fn center(&self) -> Point;
    fn road_width(&self) -> f64;
    fn stop_line_position(&self, direction: Direction) -> f64;
    fn light_anchor_position(&self, direction: Direction) -> Point;
}

/// Two straight roads crossing at right angles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossroadGeometry {
    pub center: Point,
    pub road_width: f64,
}

impl CrossroadGeometry {
    pub fn new(center: Point, road_width: f64) -> Self {
        Self { center, road_width }
    }

    fn half_width(&self) -> f64 {
        self.road_width.max(0.0) / 2.0
    }
}

impl IntersectionGeometry for CrossroadGeometry {
    fn center(&self) -> Point {
        self.center
    }

    fn road_width(&self) -> f64 {
        self.road_width
    }

    fn stop_line_position(&self, direction: Direction) -> f64 {
        let half = self.half_width();
        match direction {
            Direction::North => self.center.y - half,
            Direction::South => self.center.y + half,
            Direction::West => self.center.x - half,
            Direction::East => self.center.x + half,
        }
    }

    // Lights hang on the near-right corner of each approach.
    fn light_anchor_position(&self, direction: Direction) -> Point {
        let half = self.half_width();
        let Point { x, y } = self.center;
        match direction {
            Direction::North => Point::new(x - half, y - half),
            Direction::South => Point::new(x + half, y + half),
            Direction::West => Point::new(x - half, y + half),
            Direction::East => Point::new(x + half, y - half),
        }
    }
}

/// Coordinate of `p` on the axis a vehicle from `direction` travels along.
pub fn approach_coordinate(direction: Direction, p: Point) -> f64 {
    match direction {
        Direction::North | Direction::South => p.y,
        Direction::East | Direction::West => p.x,
    }
}

/// Signed distance still to travel before reaching the stop line.
/// Negative once the vehicle has crossed it.
pub fn distance_to_stop_line<G: IntersectionGeometry + ?Sized>(
    geometry: &G,
    direction: Direction,
    p: Point,
) -> f64 {
    let stop = geometry.stop_line_position(direction);
    let along = approach_coordinate(direction, p);
    match direction {
        Direction::North | Direction::West => stop - along,
        Direction::South | Direction::East => along - stop,
    }
}
