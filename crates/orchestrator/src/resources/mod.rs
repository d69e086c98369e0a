//! RAII resource guards for automatic cleanup.
//!
//! - [`ConnectionGuard`] - Closes an execution's connections

mod connection_guard;

pub use connection_guard::ConnectionGuard;
