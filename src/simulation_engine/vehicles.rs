// src/simulation_engine/vehicles.rs
use crate::shared_data::Direction;
use crate::simulation_engine::geometry::Point;

pub type VehicleId = u64;

/// What the detection layer needs to know about a vehicle.
pub trait TrackedVehicle {
    /// Stable for the vehicle's whole lifetime.
    fn id(&self) -> VehicleId;
    fn direction(&self) -> Direction;
    fn position(&self) -> Point;
    fn is_stationary(&self) -> bool;
}

/// Different types of vehicles in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleType {
    Car,
    Bus,
    Truck,
}

/// A vehicle heading straight through the crossroad.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    pub vehicle_type: VehicleType,
    /// Side the vehicle approaches from.
    pub direction: Direction,
    /// Front bumper position.
    pub position: Point,
    /// Cruise speed in units per second.
    pub speed: f64,
    pub length: f64,
    pub stopped: bool,
}

impl Vehicle {
    /// Creates a new vehicle with predefined lengths based on type.
    pub fn new(
        id: VehicleId,
        vehicle_type: VehicleType,
        direction: Direction,
        position: Point,
        speed: f64,
    ) -> Self {
        let length = match vehicle_type {
            VehicleType::Car => 20.0,
            VehicleType::Bus => 40.0,
            VehicleType::Truck => 48.0,
        };

        Self {
            id,
            vehicle_type,
            direction,
            position,
            speed,
            length,
            stopped: false,
        }
    }
}

impl TrackedVehicle for Vehicle {
    fn id(&self) -> VehicleId {
        self.id
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn position(&self) -> Point {
        self.position
    }

    fn is_stationary(&self) -> bool {
        self.stopped
    }
}
