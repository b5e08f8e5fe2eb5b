//! HTTP listener.
//!
//! Plain HTTP only; TLS is terminated by the ingress in front of the service.
//! The listener drains connections on SIGTERM/SIGINT before exiting.

mod server;
mod shutdown;

pub use server::{start_server, Listener, ServerError};
