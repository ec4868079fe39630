//! Stockhammer relay: family safety check-ins and chat over WebSocket.
//!
//! Clients report "I am safe", chat, react with emoji and announce typing.
//! The relay keeps the shared state in process memory and re-broadcasts the
//! affected slice of it to every connected client on each mutation.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
