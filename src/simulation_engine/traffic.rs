// src/simulation_engine/traffic.rs
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::shared_data::{Direction, LightColor, SignalLights};
use crate::simulation_engine::geometry::{distance_to_stop_line, CrossroadGeometry, Point};
use crate::simulation_engine::vehicles::{Vehicle, VehicleId, VehicleType};

// Vehicles halt this far before the stop line.
const STOP_MARGIN: f64 = 2.0;
// Bumper-to-bumper gap kept behind the vehicle ahead.
const QUEUE_GAP: f64 = 6.0;
// Below this much movement per tick a vehicle counts as stopped.
const STOPPED_EPSILON: f64 = 0.01;

/// Simple straight-through traffic used to drive the signal core.
pub struct DemoTraffic {
    pub geometry: CrossroadGeometry,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Expected spawns per second across all approaches.
    pub spawn_rate: f64,
    pub vehicles: Vec<Vehicle>,
    next_vehicle_id: VehicleId,
    rng: SmallRng,
}

impl DemoTraffic {
    pub fn new(canvas_width: f64, canvas_height: f64, road_width: f64, spawn_rate: f64, seed: u64) -> Self {
        let center = Point::new(canvas_width / 2.0, canvas_height / 2.0);
        Self {
            geometry: CrossroadGeometry::new(center, road_width),
            canvas_width,
            canvas_height,
            spawn_rate,
            vehicles: Vec::new(),
            next_vehicle_id: 1,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Where a new vehicle from `direction` appears: the canvas edge, in its lane.
    pub fn entry_point(&self, direction: Direction) -> Point {
        let lane_offset = self.geometry.road_width / 4.0;
        let c = self.geometry.center;
        match direction {
            Direction::North => Point::new(c.x - lane_offset, 0.0),
            Direction::South => Point::new(c.x + lane_offset, self.canvas_height),
            Direction::West => Point::new(0.0, c.y + lane_offset),
            Direction::East => Point::new(self.canvas_width, c.y - lane_offset),
        }
    }

    /// Spawn a vehicle at a random approach. Returns `None` if the entry is still occupied.
    pub fn spawn_vehicle(&mut self) -> Option<VehicleId> {
        let direction = Direction::ALL[self.rng.random_range(0..Direction::ALL.len())];
        // Car: 70%, Bus: 15%, Truck: 15%.
        let rand_val: f64 = self.rng.random_range(0.0..1.0);
        let vehicle_type = if rand_val < 0.70 {
            VehicleType::Car
        } else if rand_val < 0.85 {
            VehicleType::Bus
        } else {
            VehicleType::Truck
        };
        let speed = self.rng.random_range(60.0..120.0);
        self.spawn_at(direction, vehicle_type, speed)
    }

    pub fn spawn_at(
        &mut self,
        direction: Direction,
        vehicle_type: VehicleType,
        speed: f64,
    ) -> Option<VehicleId> {
        let entry = self.entry_point(direction);
        let vehicle = Vehicle::new(self.next_vehicle_id, vehicle_type, direction, entry, speed);
        let entry_distance = distance_to_stop_line(&self.geometry, direction, entry);
        let blocked = self.vehicles.iter().any(|other| {
            other.direction == direction
                && entry_distance - distance_to_stop_line(&self.geometry, direction, other.position)
                    < other.length + QUEUE_GAP
        });
        if blocked {
            return None;
        }

        let id = vehicle.id;
        self.vehicles.push(vehicle);
        self.next_vehicle_id += 1;
        Some(id)
    }

    /// Moves every vehicle for `elapsed_ms`, honoring lights and queues, then
    /// spawns new arrivals and removes vehicles that left the canvas.
    pub fn step(&mut self, elapsed_ms: u64, lights: &SignalLights) {
        let dt = elapsed_ms as f64 / 1000.0;

        for direction in Direction::ALL {
            let mut order: Vec<usize> = (0..self.vehicles.len())
                .filter(|&i| self.vehicles[i].direction == direction)
                .collect();
            order.sort_by(|&a, &b| {
                let da = distance_to_stop_line(&self.geometry, direction, self.vehicles[a].position);
                let db = distance_to_stop_line(&self.geometry, direction, self.vehicles[b].position);
                da.total_cmp(&db)
            });

            let must_stop = lights.get(direction) != LightColor::Green;
            // (distance to stop line, length) of the vehicle just ahead.
            let mut leader: Option<(f64, f64)> = None;
            for i in order {
                let vehicle = &mut self.vehicles[i];
                let gap = distance_to_stop_line(&self.geometry, direction, vehicle.position);
                let travel = vehicle.speed * dt;

                let mut limit = f64::INFINITY;
                if must_stop && gap >= 0.0 {
                    limit = (gap - STOP_MARGIN).max(0.0);
                }
                if let Some((leader_gap, leader_length)) = leader {
                    limit = limit.min((gap - leader_gap - leader_length - QUEUE_GAP).max(0.0));
                }

                let moved = travel.min(limit).max(0.0);
                vehicle.position = advance(vehicle.position, direction, moved);
                vehicle.stopped = moved < STOPPED_EPSILON;
                leader = Some((gap - moved, vehicle.length));
            }
        }

        let (width, height) = (self.canvas_width, self.canvas_height);
        self.vehicles.retain(|v| {
            v.position.x >= -v.length
                && v.position.x <= width + v.length
                && v.position.y >= -v.length
                && v.position.y <= height + v.length
        });

        let spawn_chance = self.spawn_rate * dt;
        let spawn_chance = if spawn_chance.is_nan() { 0.0 } else { spawn_chance.clamp(0.0, 1.0) };
        if self.rng.random_bool(spawn_chance) {
            self.spawn_vehicle();
        }
    }
}

fn advance(p: Point, direction: Direction, distance: f64) -> Point {
    match direction {
        Direction::North => Point::new(p.x, p.y + distance),
        Direction::South => Point::new(p.x, p.y - distance),
        Direction::West => Point::new(p.x + distance, p.y),
        Direction::East => Point::new(p.x - distance, p.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_data::Pair;

    fn traffic() -> DemoTraffic {
        DemoTraffic::new(800.0, 600.0, 80.0, 0.0, 7)
    }

    #[test]
    fn red_light_stops_vehicles_short_of_the_line() {
        let mut traffic = traffic();
        traffic.spawn_at(Direction::North, VehicleType::Car, 100.0);
        let red = SignalLights::for_pair(Pair::WestEast, LightColor::Green);
        for _ in 0..60 {
            traffic.step(100, &red);
        }
        let vehicle = &traffic.vehicles[0];
        assert!(vehicle.stopped);
        let gap = distance_to_stop_line(&traffic.geometry, Direction::North, vehicle.position);
        assert!((gap - STOP_MARGIN).abs() < 1e-9);
    }

    #[test]
    fn queued_vehicles_keep_their_distance() {
        let mut traffic = traffic();
        let red = SignalLights::all_red();
        traffic.spawn_at(Direction::West, VehicleType::Car, 100.0);
        for _ in 0..5 {
            traffic.step(100, &red);
        }
        traffic.spawn_at(Direction::West, VehicleType::Car, 100.0);
        for _ in 0..60 {
            traffic.step(100, &red);
        }
        let lead = traffic.vehicles[0].position.x;
        let follower = traffic.vehicles[1].position.x;
        assert!(lead - follower >= traffic.vehicles[0].length + QUEUE_GAP - 1e-9);
        assert!(traffic.vehicles.iter().all(|v| v.stopped));
    }

    #[test]
    fn green_light_lets_vehicles_leave_the_canvas() {
        let mut traffic = traffic();
        traffic.spawn_at(Direction::East, VehicleType::Truck, 120.0);
        let green = SignalLights::for_pair(Pair::WestEast, LightColor::Green);
        for _ in 0..100 {
            traffic.step(100, &green);
        }
        assert!(traffic.vehicles.is_empty());
    }

    #[test]
    fn occupied_entry_blocks_spawning() {
        let mut traffic = traffic();
        assert!(traffic.spawn_at(Direction::South, VehicleType::Car, 80.0).is_some());
        assert!(traffic.spawn_at(Direction::South, VehicleType::Car, 80.0).is_none());
        assert!(traffic.spawn_at(Direction::North, VehicleType::Car, 80.0).is_some());
    }

    #[test]
    fn nan_spawn_rate_spawns_nothing() {
        let mut traffic = DemoTraffic::new(800.0, 600.0, 80.0, f64::NAN, 7);
        for _ in 0..20 {
            traffic.step(100, &SignalLights::all_red());
        }
        assert!(traffic.vehicles.is_empty());
    }
}
