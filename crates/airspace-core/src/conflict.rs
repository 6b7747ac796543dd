//! Conflict evaluators.
//!
//! Every evaluator is read-only: it inspects a plane that has just been
//! updated and the rest of the fleet, and returns the violations it found.
//! The route checks thread a [`CollisionReport`] from one to the next so the
//! updated plane is reported at most once per heading update.

use chrono::{Duration, NaiveDateTime};

use crate::catalog::Catalog;
use crate::models::{Airport, Gate, Plane, Runway};
use crate::rules::fits;
use crate::spatial::{arrival_time_at_point, intersection, same_minute, within_window, Point, Route};
use crate::violation::{Violation, ViolationKind};

/// Accumulated `COLLISION_IMMINENT` findings for one heading update.
#[derive(Debug, Clone)]
pub struct CollisionReport {
    subject_id: String,
    subject_reported: bool,
    violations: Vec<Violation>,
}

impl CollisionReport {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            subject_reported: false,
            violations: Vec::new(),
        }
    }

    /// Record a collision between the subject and `other_id`.
    ///
    /// The subject is flagged on its first collision only; every other plane
    /// is flagged once per match.
    fn flag(&mut self, other_id: &str) {
        if !self.subject_reported {
            self.subject_reported = true;
            self.violations.push(Violation::plane(
                ViolationKind::CollisionImminent,
                self.subject_id.clone(),
            ));
        }
        self.violations
            .push(Violation::plane(ViolationKind::CollisionImminent, other_id));
    }

    pub fn subject_reported(&self) -> bool {
        self.subject_reported
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

/// `WRONG_AIRPORT` when the plane's airline may not land at `destination`.
pub fn check_wrong_airport(subject: &Plane, destination: &Airport) -> Option<Violation> {
    if destination.permits(&subject.airline) {
        None
    } else {
        Some(Violation::plane(
            ViolationKind::WrongAirport,
            subject.identifier.clone(),
        ))
    }
}

/// Planes in flight on the subject's route in the opposite direction.
///
/// No time window applies: sharing a reversed route is always a conflict.
pub fn check_head_on<'a>(
    subject: &Plane,
    fleet: impl IntoIterator<Item = &'a Plane>,
    mut report: CollisionReport,
) -> CollisionReport {
    let Some((origin, destination)) = subject.route() else {
        return report;
    };

    for other in fleet {
        if other.identifier == subject.identifier {
            continue;
        }
        if other.landing_time.is_some() && other.route() == Some((destination, origin)) {
            report.flag(&other.identifier);
        }
    }
    report
}

/// Planes on the subject's exact route that land strictly later.
///
/// Only later-landing planes match, so which plane triggers the alert
/// depends on the order updates arrive in.
pub fn check_overtake<'a>(
    subject: &Plane,
    fleet: impl IntoIterator<Item = &'a Plane>,
    mut report: CollisionReport,
) -> CollisionReport {
    let (Some(route), Some(landing)) = (subject.route(), subject.landing_time) else {
        return report;
    };

    for other in fleet {
        if other.identifier == subject.identifier {
            continue;
        }
        let lands_later = other.landing_time.is_some_and(|other_landing| other_landing > landing);
        if lands_later && other.route() == Some(route) {
            report.flag(&other.identifier);
        }
    }
    report
}

/// Planes on any other route that reach the crossing point of the two
/// routes in the same calendar minute as the subject.
pub fn check_crossing<'a>(
    subject: &Plane,
    fleet: impl IntoIterator<Item = &'a Plane>,
    catalog: &Catalog,
    mut report: CollisionReport,
) -> CollisionReport {
    let Some((origin, destination)) = subject.route() else {
        return report;
    };
    let Some(subject_path) = FlightPath::of(subject, catalog) else {
        return report;
    };

    for other in fleet {
        if other.identifier == subject.identifier || other.landing_time.is_none() {
            continue;
        }
        let Some(other_route) = other.route() else {
            continue;
        };
        if other_route == (origin, destination) || other_route == (destination, origin) {
            continue;
        }
        let Some(other_path) = FlightPath::of(other, catalog) else {
            continue;
        };
        if subject_path.meets_in_same_minute(&other_path) {
            report.flag(&other.identifier);
        }
    }
    report
}

/// `TOO_SMALL_GATE` when the plane is larger than the gate.
pub fn check_gate_size(plane: &Plane, gate: &Gate) -> Option<Violation> {
    (!fits(plane.size, gate.size))
        .then(|| Violation::plane(ViolationKind::TooSmallGate, plane.identifier.clone()))
}

/// `DUPLICATE_GATE` for every plane at the gate that arrives at `arrival`
/// or has not moved on to a runway, when there is more than one of them.
pub fn check_gate_occupancy<'a>(
    gate_id: &str,
    arrival: NaiveDateTime,
    fleet: impl IntoIterator<Item = &'a Plane>,
) -> Vec<Violation> {
    let occupants: Vec<&Plane> = fleet
        .into_iter()
        .filter(|plane| plane.gate.as_deref() == Some(gate_id))
        .filter(|plane| {
            plane.arrive_at_gate_time == Some(arrival) || plane.arrive_at_runway_time.is_none()
        })
        .collect();

    if occupants.len() <= 1 {
        return Vec::new();
    }
    occupants
        .into_iter()
        .map(|plane| Violation::plane(ViolationKind::DuplicateGate, plane.identifier.clone()))
        .collect()
}

/// `TOO_SMALL_RUNWAY` when the plane is larger than the runway.
pub fn check_runway_size(plane: &Plane, runway: &Runway) -> Option<Violation> {
    (!fits(plane.size, runway.size))
        .then(|| Violation::plane(ViolationKind::TooSmallRunway, plane.identifier.clone()))
}

/// `DUPLICATE_RUNWAY` for each other plane on the subject's runway arriving
/// within `separation` of it, then once for the subject if any matched.
pub fn check_runway_occupancy<'a>(
    subject: &Plane,
    runway_id: &str,
    fleet: impl IntoIterator<Item = &'a Plane>,
    separation: Duration,
) -> Vec<Violation> {
    let mut violations: Vec<Violation> = fleet
        .into_iter()
        .filter(|other| other.identifier != subject.identifier)
        .filter(|other| other.runway.as_deref() == Some(runway_id))
        .filter(|other| {
            within_window(
                subject.arrive_at_runway_time,
                other.arrive_at_runway_time,
                separation,
            )
        })
        .map(|other| Violation::plane(ViolationKind::DuplicateRunway, other.identifier.clone()))
        .collect();

    if !violations.is_empty() {
        violations.push(Violation::plane(
            ViolationKind::DuplicateRunway,
            subject.identifier.clone(),
        ));
    }
    violations
}

/// `TOO_MANY_PASSENGERS` when `requested` exceeds the plane's capacity.
pub fn check_passenger_count(plane: &Plane, requested: u32) -> Option<Violation> {
    (requested > plane.max_passenger_count).then(|| {
        Violation::plane(ViolationKind::TooManyPassengers, plane.identifier.clone())
    })
}

/// A plane's straight route with its departure time and speed.
struct FlightPath {
    route: Route,
    take_off: NaiveDateTime,
    speed: f64,
}

impl FlightPath {
    fn of(plane: &Plane, catalog: &Catalog) -> Option<Self> {
        let (origin, destination) = plane.route()?;
        let origin = catalog.airport(origin).ok()?;
        let destination = catalog.airport(destination).ok()?;
        Some(Self {
            route: Route::new(Point::from(&origin), Point::from(&destination)),
            take_off: plane.take_off_time?,
            speed: plane.speed,
        })
    }

    fn arrival_at(&self, point: Point) -> Option<NaiveDateTime> {
        arrival_time_at_point(self.route.origin, self.take_off, self.speed, point)
    }

    /// Any degenerate input (parallel routes, zero speed) means no conflict.
    fn meets_in_same_minute(&self, other: &FlightPath) -> bool {
        let Some(crossing) = intersection(self.route, other.route) else {
            return false;
        };
        match (self.arrival_at(crossing), other.arrival_at(crossing)) {
            (Some(mine), Some(theirs)) => same_minute(mine, theirs),
            _ => false,
        }
    }
}
