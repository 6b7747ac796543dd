//! Airspace core - conflict detection for airport traffic.
//!
//! Pure, synchronous logic: the data model, planar geometry, the size rule,
//! the plane state store and the conflict evaluators. No I/O.

pub mod board;
pub mod catalog;
pub mod conflict;
pub mod error;
pub mod models;
pub mod rules;
pub mod spatial;
pub mod time;
pub mod violation;

pub use board::FlightBoard;
pub use catalog::Catalog;
pub use conflict::CollisionReport;
pub use error::{EngineError, EntityKind};
pub use models::{
    Airline, Airport, Gate, GateUpdate, HeadingUpdate, PassengerCountUpdate, Plane, Runway,
    RunwayUpdate, SizeClass,
};
pub use rules::{fits, SafetyRules};
pub use spatial::{distance, heading, intersection, Point, Route};
pub use violation::{AlertPayload, SubjectType, Violation, ViolationKind};
