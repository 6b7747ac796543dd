//! Plane state store and the four event operations.
//!
//! Each `apply_*` call resolves every referenced entity first, so a missing
//! plane, airport, gate or runway leaves the board untouched. It then
//! commits the state change and runs the evaluators against the updated
//! fleet. Violations are reported, never rejected: the change is committed
//! regardless of what the evaluators find.

use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::conflict::{self, CollisionReport};
use crate::error::{EngineError, EntityKind};
use crate::models::{GateUpdate, HeadingUpdate, PassengerCountUpdate, Plane, RunwayUpdate};
use crate::rules::SafetyRules;
use crate::violation::Violation;

/// Current flight state of every plane, keyed by identifier.
#[derive(Debug, Default)]
pub struct FlightBoard {
    planes: BTreeMap<String, Plane>,
    rules: SafetyRules,
}

impl FlightBoard {
    pub fn new(rules: SafetyRules) -> Self {
        Self {
            planes: BTreeMap::new(),
            rules,
        }
    }

    pub fn rules(&self) -> &SafetyRules {
        &self.rules
    }

    /// Insert or replace a plane.
    pub fn insert_plane(&mut self, plane: Plane) {
        self.planes.insert(plane.identifier.clone(), plane);
    }

    pub fn plane(&self, identifier: &str) -> Result<&Plane, EngineError> {
        self.planes
            .get(identifier)
            .ok_or_else(|| EngineError::not_found(EntityKind::Plane, identifier))
    }

    fn plane_mut(&mut self, identifier: &str) -> Result<&mut Plane, EngineError> {
        self.planes
            .get_mut(identifier)
            .ok_or_else(|| EngineError::not_found(EntityKind::Plane, identifier))
    }

    /// All planes in identifier order.
    pub fn planes(&self) -> impl Iterator<Item = &Plane> {
        self.planes.values()
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Commit a new route and check it against the fleet.
    pub fn apply_heading(
        &mut self,
        catalog: &Catalog,
        update: &HeadingUpdate,
    ) -> Result<Vec<Violation>, EngineError> {
        self.plane(&update.plane)?;
        catalog.airport(&update.origin)?;
        let destination = catalog.airport(&update.destination)?;

        let plane = self.plane_mut(&update.plane)?;
        plane.depart(update);
        let subject = plane.clone();

        let mut violations = Vec::new();
        violations.extend(conflict::check_wrong_airport(&subject, &destination));

        let report = CollisionReport::new(subject.identifier.clone());
        let report = conflict::check_head_on(&subject, self.planes(), report);
        let report = conflict::check_overtake(&subject, self.planes(), report);
        let report = conflict::check_crossing(&subject, self.planes(), catalog, report);
        violations.extend(report.into_violations());

        Ok(violations)
    }

    /// Record a gate arrival, or clear the gate when no arrival time is given.
    pub fn apply_gate(
        &mut self,
        catalog: &Catalog,
        update: &GateUpdate,
    ) -> Result<Vec<Violation>, EngineError> {
        self.plane(&update.plane)?;
        let gate = catalog.gate(&update.gate)?;

        let plane = self.plane_mut(&update.plane)?;
        let Some(arrival) = update.arrive_at_time else {
            plane.leave_gate();
            return Ok(Vec::new());
        };

        plane.arrive_at_gate(&gate.identifier, arrival);
        let subject = plane.clone();

        let mut violations = Vec::new();
        violations.extend(conflict::check_gate_size(&subject, &gate));
        violations.extend(conflict::check_gate_occupancy(
            &gate.identifier,
            arrival,
            self.planes(),
        ));
        Ok(violations)
    }

    /// Record a runway arrival, or land the plane when no arrival time is given.
    pub fn apply_runway(
        &mut self,
        catalog: &Catalog,
        update: &RunwayUpdate,
    ) -> Result<Vec<Violation>, EngineError> {
        self.plane(&update.plane)?;
        let runway = catalog.runway(&update.runway)?;
        let separation = self.rules.runway_separation();

        let plane = self.plane_mut(&update.plane)?;
        let Some(arrival) = update.arrive_at_time else {
            plane.land();
            return Ok(Vec::new());
        };

        plane.arrive_at_runway(&runway.identifier, arrival);
        let subject = plane.clone();

        let mut violations = Vec::new();
        violations.extend(conflict::check_runway_size(&subject, &runway));
        violations.extend(conflict::check_runway_occupancy(
            &subject,
            &runway.identifier,
            self.planes(),
            separation,
        ));
        Ok(violations)
    }

    /// Store the passenger count, flagging it when over capacity.
    pub fn apply_passenger_count(
        &mut self,
        update: &PassengerCountUpdate,
    ) -> Result<Vec<Violation>, EngineError> {
        let plane = self.plane_mut(&update.plane)?;
        let violation = conflict::check_passenger_count(plane, update.passenger_count);
        plane.current_passenger_count = update.passenger_count;
        Ok(violation.into_iter().collect())
    }
}
