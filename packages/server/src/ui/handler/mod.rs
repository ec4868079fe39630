//! WebSocket relay handler.

mod websocket;

pub use websocket::relay_handler;
