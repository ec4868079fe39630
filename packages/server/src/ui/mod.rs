//! UI layer: HTTP/WebSocket surface of the relay.

mod handler;
pub mod router;
mod server;
mod signal;
pub mod state; // UseCase 層の束ねとして bin / tests から組み立てるため public

pub use server::{Server, build_router};
pub use state::AppState;
