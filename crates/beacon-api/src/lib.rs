//! # beacon-api
//!
//! The outward face of Beacon: REST endpoints under `/api`, the
//! websocket at `/ws`, and the glue that assembles configuration, the
//! store, and the realtime engine into a running server.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_state, run_server};
pub use router::build_router;
pub use state::AppState;
