//! Reference data: airports, airlines, gates and runways.
//!
//! Read-only while events are processed, so it sits outside the flight
//! board lock in concurrent maps.

use dashmap::DashMap;

use crate::error::{EngineError, EntityKind};
use crate::models::{Airline, Airport, Gate, Runway};

#[derive(Debug, Default)]
pub struct Catalog {
    airports: DashMap<String, Airport>,
    airlines: DashMap<String, Airline>,
    gates: DashMap<String, Gate>,
    runways: DashMap<String, Runway>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn airport(&self, name: &str) -> Result<Airport, EngineError> {
        self.airports
            .get(name)
            .map(|airport| airport.value().clone())
            .ok_or_else(|| EngineError::not_found(EntityKind::Airport, name))
    }

    pub fn airline(&self, name: &str) -> Result<Airline, EngineError> {
        self.airlines
            .get(name)
            .map(|airline| airline.value().clone())
            .ok_or_else(|| EngineError::not_found(EntityKind::Airline, name))
    }

    pub fn gate(&self, identifier: &str) -> Result<Gate, EngineError> {
        self.gates
            .get(identifier)
            .map(|gate| gate.value().clone())
            .ok_or_else(|| EngineError::not_found(EntityKind::Gate, identifier))
    }

    pub fn runway(&self, identifier: &str) -> Result<Runway, EngineError> {
        self.runways
            .get(identifier)
            .map(|runway| runway.value().clone())
            .ok_or_else(|| EngineError::not_found(EntityKind::Runway, identifier))
    }

    /// Insert or replace an airport. No two airports may share coordinates.
    pub fn insert_airport(&self, airport: Airport) -> Result<(), EngineError> {
        let colocated = self.airports.iter().find(|entry| {
            entry.key() != &airport.name && entry.x == airport.x && entry.y == airport.y
        });
        if let Some(existing) = colocated {
            return Err(EngineError::Fixture(format!(
                "airports '{}' and '{}' cannot be co-located",
                existing.key(),
                airport.name
            )));
        }
        self.airports.insert(airport.name.clone(), airport);
        Ok(())
    }

    pub fn insert_airline(&self, airline: Airline) {
        self.airlines.insert(airline.name.clone(), airline);
    }

    /// Permit `airline` to use `airport`, recording the link on both sides.
    pub fn link_airline(&self, airport: &str, airline: &str) -> Result<(), EngineError> {
        if !self.airlines.contains_key(airline) {
            return Err(EngineError::not_found(EntityKind::Airline, airline));
        }
        match self.airports.get_mut(airport) {
            Some(mut entry) => {
                entry.airlines.insert(airline.to_string());
            }
            None => return Err(EngineError::not_found(EntityKind::Airport, airport)),
        }
        if let Some(mut entry) = self.airlines.get_mut(airline) {
            entry.airports.insert(airport.to_string());
        }
        Ok(())
    }

    pub fn insert_gate(&self, gate: Gate) -> Result<(), EngineError> {
        if !self.airports.contains_key(&gate.airport) {
            return Err(EngineError::not_found(EntityKind::Airport, gate.airport));
        }
        self.gates.insert(gate.identifier.clone(), gate);
        Ok(())
    }

    pub fn insert_runway(&self, runway: Runway) -> Result<(), EngineError> {
        if !self.airports.contains_key(&runway.airport) {
            return Err(EngineError::not_found(EntityKind::Airport, runway.airport));
        }
        self.runways.insert(runway.identifier.clone(), runway);
        Ok(())
    }

    pub fn airport_count(&self) -> usize {
        self.airports.len()
    }

    pub fn airline_count(&self) -> usize {
        self.airlines.len()
    }

    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    pub fn runway_count(&self) -> usize {
        self.runways.len()
    }
}
