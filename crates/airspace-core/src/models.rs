//! Core data models for airport traffic monitoring.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Size class shared by planes, gates and runways.
///
/// Ordered `Small < Medium < Large`; a plane fits a slot when its class is
/// not larger than the slot's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SizeClass {
    #[default]
    Small,
    Medium,
    Large,
}

impl SizeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::Small => "SMALL",
            SizeClass::Medium => "MEDIUM",
            SizeClass::Large => "LARGE",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeClass {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SMALL" => Ok(SizeClass::Small),
            "MEDIUM" => Ok(SizeClass::Medium),
            "LARGE" => Ok(SizeClass::Large),
            other => Err(EngineError::Fixture(format!("unknown size class '{other}'"))),
        }
    }
}

/// An airport on the planar map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub name: String,
    pub x: f64,
    pub y: f64,
    /// Airlines permitted to land here
    #[serde(default)]
    pub airlines: BTreeSet<String>,
}

impl Airport {
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            airlines: BTreeSet::new(),
        }
    }

    /// Permit an airline to land here.
    pub fn with_airline(mut self, airline: impl Into<String>) -> Self {
        self.airlines.insert(airline.into());
        self
    }

    pub fn permits(&self, airline: &str) -> bool {
        self.airlines.contains(airline)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    pub name: String,
    /// Airports this airline may use
    #[serde(default)]
    pub airports: BTreeSet<String>,
}

impl Airline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            airports: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    pub identifier: String,
    pub size: SizeClass,
    pub airport: String,
}

impl Gate {
    pub fn new(identifier: impl Into<String>, size: SizeClass, airport: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            size,
            airport: airport.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runway {
    pub identifier: String,
    pub size: SizeClass,
    pub airport: String,
}

impl Runway {
    pub fn new(identifier: impl Into<String>, size: SizeClass, airport: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            size,
            airport: airport.into(),
        }
    }
}

/// A plane and its current flight state.
///
/// Identity, size, airline and capacity are fixed at creation. Everything
/// else is flight state written by the event handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub identifier: String,
    pub size: SizeClass,
    pub current_passenger_count: u32,
    pub max_passenger_count: u32,
    pub airline: String,
    pub gate: Option<String>,
    pub runway: Option<String>,
    /// Take-off airport of the current route
    pub origin: Option<String>,
    /// Landing airport of the current route
    pub destination: Option<String>,
    /// Degrees clockwise from north
    pub heading: f64,
    /// Distance units per hour
    pub speed: f64,
    pub take_off_time: Option<NaiveDateTime>,
    pub landing_time: Option<NaiveDateTime>,
    pub arrive_at_gate_time: Option<NaiveDateTime>,
    pub arrive_at_runway_time: Option<NaiveDateTime>,
}

impl Plane {
    /// Create a grounded, empty plane.
    pub fn new(
        identifier: impl Into<String>,
        size: SizeClass,
        airline: impl Into<String>,
        max_passenger_count: u32,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            size,
            current_passenger_count: 0,
            max_passenger_count,
            airline: airline.into(),
            gate: None,
            runway: None,
            origin: None,
            destination: None,
            heading: 0.0,
            speed: 0.0,
            take_off_time: None,
            landing_time: None,
            arrive_at_gate_time: None,
            arrive_at_runway_time: None,
        }
    }

    /// Current (origin, destination) pair, if both are known.
    pub fn route(&self) -> Option<(&str, &str)> {
        match (&self.origin, &self.destination) {
            (Some(origin), Some(destination)) => Some((origin.as_str(), destination.as_str())),
            _ => None,
        }
    }

    /// Commit a heading update: new route, timing and velocity.
    pub fn depart(&mut self, update: &HeadingUpdate) {
        self.origin = Some(update.origin.clone());
        self.destination = Some(update.destination.clone());
        self.take_off_time = Some(update.take_off_time);
        self.landing_time = Some(update.landing_time);
        self.heading = update.direction;
        self.speed = update.speed;
        self.runway = None;
    }

    pub fn arrive_at_gate(&mut self, gate: &str, at: NaiveDateTime) {
        self.gate = Some(gate.to_string());
        self.arrive_at_gate_time = Some(at);
    }

    /// Leaving a gate also releases any runway assignment.
    pub fn leave_gate(&mut self) {
        self.gate = None;
        self.arrive_at_gate_time = None;
        self.runway = None;
    }

    pub fn arrive_at_runway(&mut self, runway: &str, at: NaiveDateTime) {
        self.runway = Some(runway.to_string());
        self.arrive_at_runway_time = Some(at);
    }

    /// Complete a landing: the plane becomes a ground vehicle at its former
    /// destination.
    pub fn land(&mut self) {
        self.runway = None;
        self.arrive_at_runway_time = None;
        self.gate = None;
        self.heading = 0.0;
        self.speed = 0.0;
        self.origin = self.destination.take();
        self.take_off_time = None;
        self.landing_time = None;
    }
}

/// Heading/speed/route report for a plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingUpdate {
    pub plane: String,
    /// Degrees clockwise from north
    pub direction: f64,
    pub speed: f64,
    pub origin: String,
    pub destination: String,
    #[serde(with = "crate::time::timestamp")]
    pub take_off_time: NaiveDateTime,
    #[serde(with = "crate::time::timestamp")]
    pub landing_time: NaiveDateTime,
}

/// Gate report. No arrival time means the plane has left the gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateUpdate {
    pub plane: String,
    pub gate: String,
    #[serde(
        default,
        with = "crate::time::optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub arrive_at_time: Option<NaiveDateTime>,
}

/// Runway report. No arrival time means the plane has landed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayUpdate {
    pub plane: String,
    pub runway: String,
    #[serde(
        default,
        with = "crate::time::optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub arrive_at_time: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerCountUpdate {
    pub plane: String,
    pub passenger_count: u32,
}
