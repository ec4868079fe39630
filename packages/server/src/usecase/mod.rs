//! UseCase layer: one use case per relay operation.
//!
//! Every use case that mutates state, or that must observe state in a
//! consistent order with broadcasts, runs under the shared [`MutationLock`].

mod connect_client;
mod disconnect_client;
mod error;
mod mutation_lock;
mod report_safety;
mod request_initial_data;
mod reset_data;
mod send_message;
mod toggle_reaction;
mod typing;

pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{ConnectError, MutationError};
pub use mutation_lock::MutationLock;
pub use report_safety::ReportSafetyUseCase;
pub use request_initial_data::RequestInitialDataUseCase;
pub use reset_data::ResetDataUseCase;
pub use send_message::SendMessageUseCase;
pub use toggle_reaction::ToggleReactionUseCase;
pub use typing::TypingUseCase;
