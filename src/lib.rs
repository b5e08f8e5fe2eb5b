//! pipeline-hello: a deployment smoke-test service.
//!
//! Answers `GET /` with a fixed confirmation string on `0.0.0.0:5000` so a
//! CI/CD pipeline can prove its artifact was built, scheduled and routed.

pub mod config;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use config::{AppConfig, ConfigError};
pub use crate::http::{start_server, Listener, ServerError};
pub use routes::create_router;
