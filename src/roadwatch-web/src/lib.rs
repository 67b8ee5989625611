//! Roadwatch detection gateway - HTTP surface for violation detection

pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ERROR_KIND_HEADER};
pub use server::{router, serve, DEFAULT_MAX_BODY_BYTES};
pub use state::AppState;
