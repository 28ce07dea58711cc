// src/detection/detection_field.rs

use std::collections::HashSet;

use crate::global_variables::STOP_LINE_TOLERANCE;
use crate::shared_data::{DemandSnapshot, DetectionRecord, Direction, LightColor, SignalLights};
use crate::simulation_engine::geometry::{
    distance_to_stop_line, CrossroadGeometry, IntersectionGeometry, Rect,
};
use crate::simulation_engine::vehicles::{TrackedVehicle, VehicleId};

/// Converts vehicle positions into per-approach demand records.
///
/// Each approach has a sensing zone as wide as the road, reaching `zone_depth`
/// units upstream from its stop line. Zone membership is tracked here, keyed by
/// vehicle id, so arrivals are counted on entry only.
#[derive(Debug, Clone)]
pub struct DetectionField<G = CrossroadGeometry> {
    geometry: G,
    zone_depth: f64,
    records: [DetectionRecord; 4],
    inside: HashSet<(VehicleId, Direction)>,
}

impl<G: IntersectionGeometry> DetectionField<G> {
    pub fn new(geometry: G, zone_depth: f64) -> Self {
        let mut field = Self {
            geometry,
            zone_depth: 0.0,
            records: [DetectionRecord::default(); 4],
            inside: HashSet::new(),
        };
        field.configure(zone_depth);
        field
    }

    /// Sets the zone depth for every approach and resets all records.
    pub fn configure(&mut self, zone_depth: f64) {
        if !(zone_depth > 0.0 && zone_depth.is_finite()) {
            log::warn!(
                "Zone depth {} leaves every detection zone empty",
                zone_depth
            );
        }
        self.zone_depth = zone_depth;
        self.records = [DetectionRecord::default(); 4];
        self.inside.clear();
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn zone_depth(&self) -> f64 {
        self.zone_depth
    }

    /// Sensing rectangle behind the stop line of `direction`.
    pub fn zone_for(&self, direction: Direction) -> Rect {
        let width = self.geometry.road_width();
        let depth = self.zone_depth;
        if !(width > 0.0 && width.is_finite() && depth > 0.0 && depth.is_finite()) {
            return Rect::EMPTY;
        }

        let half = width / 2.0;
        let center = self.geometry.center();
        let stop = self.geometry.stop_line_position(direction);
        match direction {
            Direction::North => Rect {
                min_x: center.x - half,
                max_x: center.x + half,
                min_y: stop - depth,
                max_y: stop,
            },
            Direction::South => Rect {
                min_x: center.x - half,
                max_x: center.x + half,
                min_y: stop,
                max_y: stop + depth,
            },
            Direction::West => Rect {
                min_x: stop - depth,
                max_x: stop,
                min_y: center.y - half,
                max_y: center.y + half,
            },
            Direction::East => Rect {
                min_x: stop,
                max_x: stop + depth,
                min_y: center.y - half,
                max_y: center.y + half,
            },
        }
    }

    /// Refreshes every record from the current vehicle set.
    ///
    /// `lights` is `None` before the controller has produced any signal state,
    /// which is handled like an all-red intersection.
    pub fn update<V: TrackedVehicle>(
        &mut self,
        vehicles: &[V],
        lights: Option<&SignalLights>,
        now_ms: u64,
    ) {
        for record in self.records.iter_mut() {
            record.cars_waiting = 0;
        }

        let startup = lights.map_or(true, SignalLights::is_all_red);
        let zones = Direction::ALL.map(|d| self.zone_for(d));
        let mut present = HashSet::with_capacity(vehicles.len());

        for vehicle in vehicles {
            let direction = vehicle.direction();
            let position = vehicle.position();
            if !zones[direction.index()].contains(position) {
                continue;
            }

            let key = (vehicle.id(), direction);
            present.insert(key);
            let record = &mut self.records[direction.index()];
            if self.inside.insert(key) {
                record.total_arrivals += 1;
                log::trace!("Vehicle {} entered the {:?} zone", key.0, direction);
            }

            if startup {
                record.cars_waiting += 1;
                continue;
            }

            let color = lights.map_or(LightColor::Red, |l| l.get(direction));
            if color == LightColor::Red && vehicle.is_stationary() {
                record.cars_waiting += 1;
                let gap = distance_to_stop_line(&self.geometry, direction, position);
                if record.first_wait_start_ms.is_none() && gap.abs() <= STOP_LINE_TOLERANCE {
                    record.first_wait_start_ms = Some(now_ms);
                    log::debug!("{:?} queue reached the stop line at {} ms", direction, now_ms);
                }
            }
        }

        // Anything not seen inside a zone this tick has left it.
        self.inside.retain(|key| present.contains(key));

        for record in self.records.iter_mut() {
            if let Some(start) = record.first_wait_start_ms {
                record.wait_time_ms = now_ms.saturating_sub(start);
            }
        }
    }

    pub fn record(&self, direction: Direction) -> &DetectionRecord {
        &self.records[direction.index()]
    }

    pub fn demand_snapshot(&self) -> DemandSnapshot {
        Direction::ALL
            .into_iter()
            .map(|d| (d, *self.record(d)))
            .collect()
    }

    /// Zeroes the arrival count of one approach to start a fresh demand window.
    pub fn reset(&mut self, direction: Direction) {
        self.records[direction.index()].total_arrivals = 0;
    }

    pub fn reset_all(&mut self) {
        for direction in Direction::ALL {
            self.reset(direction);
        }
    }

    /// Stops the wait clock of an approach, typically once it is served.
    pub fn clear_wait(&mut self, direction: Direction) {
        let record = &mut self.records[direction.index()];
        record.first_wait_start_ms = None;
        record.wait_time_ms = 0;
    }
}
