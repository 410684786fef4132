//! REST API server for the statutory interest calculator.
//!
//! Exposes `/calc395`, `/rates` and `/health` over the calculation kernel
//! (`calc_core`) and the rates ingestion adapter (`adapter_rates`).

pub mod config;
pub mod routes;
pub mod server;

// Re-export the kernel and adapter for integration
pub use adapter_rates;
pub use calc_core;

/// Server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
