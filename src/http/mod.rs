//! HTTP server module: router, middleware and shared state.

mod middleware;
mod server;

pub use middleware::{client_identifier, rate_limit};
pub use server::{build_router, AppState, HttpServer};
