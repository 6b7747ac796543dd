//! Planar geometry for route conflict checks.
//!
//! Airports live on a flat synthetic map: x grows east, y grows north.
//! No great-circle math is involved.

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::Airport;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<&Airport> for Point {
    fn from(airport: &Airport) -> Self {
        Point::new(airport.x, airport.y)
    }
}

/// A straight route between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    pub origin: Point,
    pub destination: Point,
}

impl Route {
    pub fn new(origin: Point, destination: Point) -> Self {
        Self {
            origin,
            destination,
        }
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Compass bearing in degrees `[0, 360)` from `origin` to `destination`.
pub fn heading(origin: Point, destination: Point) -> f64 {
    let theta = (origin.x - destination.x)
        .atan2(destination.y - origin.y)
        .to_degrees();
    let bearing = (theta + 90.0).rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}

/// Crossing point of the two infinite lines through each route.
///
/// Returns `None` when the lines are parallel or coincident.
pub fn intersection(first: Route, second: Route) -> Option<Point> {
    let (x1, y1) = (first.origin.x, first.origin.y);
    let (x2, y2) = (first.destination.x, first.destination.y);
    let (x3, y3) = (second.origin.x, second.origin.y);
    let (x4, y4) = (second.destination.x, second.destination.y);

    let denom = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }

    let first_det = x1 * y2 - y1 * x2;
    let second_det = x3 * y4 - y3 * x4;
    let x = (first_det * (x3 - x4) - (x1 - x2) * second_det) / denom;
    let y = (first_det * (y3 - y4) - (y1 - y2) * second_det) / denom;

    if x.is_finite() && y.is_finite() {
        Some(Point::new(x, y))
    } else {
        None
    }
}

/// Time a plane leaving `origin` at `take_off` with constant `speed`
/// (distance per hour) reaches `point`.
///
/// `None` for zero, negative or non-finite speed, or when the offset does
/// not fit a timestamp.
pub fn arrival_time_at_point(
    origin: Point,
    take_off: NaiveDateTime,
    speed: f64,
    point: Point,
) -> Option<NaiveDateTime> {
    if !speed.is_finite() || speed <= 0.0 {
        return None;
    }
    let seconds = distance(origin, point) / speed * 3600.0;
    let offset = std::time::Duration::try_from_secs_f64(seconds).ok()?;
    let offset = Duration::from_std(offset).ok()?;
    take_off.checked_add_signed(offset)
}

/// True when both timestamps fall in the same calendar minute.
pub fn same_minute(first: NaiveDateTime, second: NaiveDateTime) -> bool {
    first.date() == second.date()
        && first.hour() == second.hour()
        && first.minute() == second.minute()
}

/// True when both timestamps are known and strictly closer than `window`.
pub fn within_window(
    first: Option<NaiveDateTime>,
    second: Option<NaiveDateTime>,
    window: Duration,
) -> bool {
    match (first, second) {
        (Some(first), Some(second)) => (first - second).abs() < window,
        _ => false,
    }
}
