//! Airspace CLI - command line tools for the airspace server.
//!
//! - send_event: publish one heading, gate, runway or passenger-count event

pub mod client;

pub use client::EventClient;
