//! Shared library surface for the airspace server and its tests.

pub mod alerts;
pub mod api;
pub mod config;
pub mod fixtures;
pub mod loops;
pub mod state;
