//! Terminal sync client for the Stockhammer relay.
//!
//! Keeps a local mirror of the shared state (replaced by `INITIAL_DATA`,
//! patched by `UPDATE_*`) and turns typed lines into protocol messages.

pub mod domain;
pub mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
