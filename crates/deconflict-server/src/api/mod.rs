//! API routes for the deconfliction server.

mod routes;

pub use routes::{CheckRequest, ConfigResponse};

use axum::Router;

pub fn routes() -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router()
}

#[cfg(test)]
mod tests;
