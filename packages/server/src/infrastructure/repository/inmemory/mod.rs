//! In-memory repositories (process lifetime, no persistence).

pub mod state;

pub use state::InMemoryStateRepository;
