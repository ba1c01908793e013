//! HTTP API: server, routing, and request/response mapping.

pub mod app;
pub mod middleware;
pub mod server;

pub use app::build_app;
pub use server::{Server, shutdown_signal};
