//! Background loops for continuous processing.

pub mod alert_loop;
