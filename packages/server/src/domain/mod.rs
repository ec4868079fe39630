//! Domain layer: value objects, entities, the shared state aggregate and the
//! ports (traits) the outer layers implement.

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod notification;
pub mod repository;
pub mod state;
pub mod value_object;

pub use entity::{
    ChatMessage, ReactionGroup, ReactionRequest, ReactionToggle, SafetyReport, TypingUser,
};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use notification::Notification;
pub use repository::StateRepository;
pub use state::{FamilyState, Snapshot};
pub use value_object::{
    ConnectionId, ConnectionIdFactory, Emoji, MemberId, MessageBody, MessageId, Timestamp,
    UserName,
};
