//! In-memory state store.
//!
//! Reference data sits in the [`Catalog`]'s concurrent maps. Plane flight
//! state sits behind a single mutex: an event's mutation and the conflict
//! scan that follows run inside one critical section, so no evaluator sees
//! another event half-applied. Alerts are queued after the lock is released.

use std::sync::{Mutex, MutexGuard, PoisonError};

use airspace_core::{
    Catalog, EngineError, FlightBoard, GateUpdate, HeadingUpdate, PassengerCountUpdate, Plane,
    RunwayUpdate, SafetyRules, Violation,
};

use crate::alerts::AlertDispatcher;
use crate::config::Config;

/// Application state - catalog, flight board and alert queue.
pub struct AppState {
    config: Config,
    catalog: Catalog,
    board: Mutex<FlightBoard>,
    alerts: AlertDispatcher,
}

impl AppState {
    pub fn new(config: Config, alerts: AlertDispatcher) -> Self {
        Self::with_rules(config, alerts, SafetyRules::default())
    }

    pub fn with_rules(config: Config, alerts: AlertDispatcher, rules: SafetyRules) -> Self {
        Self {
            config,
            catalog: Catalog::new(),
            board: Mutex::new(FlightBoard::new(rules)),
            alerts,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn board(&self) -> MutexGuard<'_, FlightBoard> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a heading update. Returns the number of violations queued.
    pub fn handle_heading(&self, update: &HeadingUpdate) -> Result<usize, EngineError> {
        tracing::debug!(
            plane = %update.plane,
            origin = %update.origin,
            destination = %update.destination,
            "Heading update"
        );
        let violations = self.board().apply_heading(&self.catalog, update)?;
        Ok(self.report(violations))
    }

    pub fn handle_gate(&self, update: &GateUpdate) -> Result<usize, EngineError> {
        tracing::debug!(
            plane = %update.plane,
            gate = %update.gate,
            arriving = update.arrive_at_time.is_some(),
            "Gate update"
        );
        let violations = self.board().apply_gate(&self.catalog, update)?;
        Ok(self.report(violations))
    }

    pub fn handle_runway(&self, update: &RunwayUpdate) -> Result<usize, EngineError> {
        tracing::debug!(
            plane = %update.plane,
            runway = %update.runway,
            arriving = update.arrive_at_time.is_some(),
            "Runway update"
        );
        let violations = self.board().apply_runway(&self.catalog, update)?;
        Ok(self.report(violations))
    }

    pub fn handle_passenger_count(&self, update: &PassengerCountUpdate) -> Result<usize, EngineError> {
        tracing::debug!(
            plane = %update.plane,
            passenger_count = update.passenger_count,
            "Passenger count update"
        );
        let violations = self.board().apply_passenger_count(update)?;
        Ok(self.report(violations))
    }

    fn report(&self, violations: Vec<Violation>) -> usize {
        let count = violations.len();
        for violation in &violations {
            tracing::warn!("Violation detected: {}", violation);
        }
        if count > 0 {
            self.alerts.enqueue(violations);
        }
        count
    }

    /// Register a plane with empty flight state.
    pub fn insert_plane(&self, plane: Plane) {
        self.board().insert_plane(plane);
    }

    pub fn get_plane(&self, identifier: &str) -> Option<Plane> {
        self.board().plane(identifier).ok().cloned()
    }

    pub fn get_all_planes(&self) -> Vec<Plane> {
        self.board().planes().cloned().collect()
    }

    pub fn plane_count(&self) -> usize {
        self.board().len()
    }
}
