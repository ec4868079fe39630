//! Data Transfer Objects (DTOs) for the relay protocol.
//!
//! - `websocket`: envelopes and payloads exchanged over the socket
//! - `conversion`: DTO ↔ domain conversion

pub mod conversion;
pub mod websocket;
