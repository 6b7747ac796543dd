//! Violation records and the alert wire payload.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Safety or capacity rule that was broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    TooManyPassengers,
    TooSmallGate,
    DuplicateGate,
    TooSmallRunway,
    DuplicateRunway,
    WrongAirport,
    CollisionImminent,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::TooManyPassengers => "TOO_MANY_PASSENGERS",
            ViolationKind::TooSmallGate => "TOO_SMALL_GATE",
            ViolationKind::DuplicateGate => "DUPLICATE_GATE",
            ViolationKind::TooSmallRunway => "TOO_SMALL_RUNWAY",
            ViolationKind::DuplicateRunway => "DUPLICATE_RUNWAY",
            ViolationKind::WrongAirport => "WRONG_AIRPORT",
            ViolationKind::CollisionImminent => "COLLISION_IMMINENT",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubjectType {
    Plane,
}

/// A detected rule breach about one subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub subject_type: SubjectType,
    pub subject_id: String,
}

impl Violation {
    pub fn plane(kind: ViolationKind, plane_id: impl Into<String>) -> Self {
        Self {
            kind,
            subject_type: SubjectType::Plane,
            subject_id: plane_id.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?} {})", self.kind, self.subject_type, self.subject_id)
    }
}

/// Body posted to the external monitoring endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPayload {
    pub team_id: String,
    pub error: ViolationKind,
    pub obj_type: SubjectType,
    pub id: String,
}

impl AlertPayload {
    pub fn new(team_id: impl Into<String>, violation: &Violation) -> Self {
        Self {
            team_id: team_id.into(),
            error: violation.kind,
            obj_type: violation.subject_type,
            id: violation.subject_id.clone(),
        }
    }
}
