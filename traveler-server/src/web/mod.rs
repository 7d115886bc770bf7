//! HTTP surface for the journey monitor.
//!
//! Exposes coordinator snapshots and the registered services over JSON.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
