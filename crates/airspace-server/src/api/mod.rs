//! HTTP API for the airspace server.

mod routes;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    routes::create_router()
}

#[cfg(test)]
mod tests;
