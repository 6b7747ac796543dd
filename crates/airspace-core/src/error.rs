use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Kind of entity an event may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Plane,
    Airport,
    Airline,
    Gate,
    Runway,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Plane => "plane",
            EntityKind::Airport => "airport",
            EntityKind::Airline => "airline",
            EntityKind::Gate => "gate",
            EntityKind::Runway => "runway",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: String },
    #[error("invalid reference data: {0}")]
    Fixture(String),
}

impl EngineError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::NotFound { .. })
    }
}
