//! Infrastructure layer: concrete state store, connection registry and wire format.

pub mod dto;
pub mod message_pusher;
pub mod repository;
