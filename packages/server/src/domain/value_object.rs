//! Value objects.
//!
//! Every piece of client-supplied text is validated on construction, so a
//! value that exists is known to be non-empty and within its length limit.

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// Defines a validated, trimmed string value object.
macro_rules! text_value_object {
    ($(#[$meta:meta])* $name:ident, $field:literal, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Maximum length in characters
            pub const MAX_LEN: usize = $max;

            pub fn new(value: String) -> Result<Self, ValueObjectError> {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(ValueObjectError::Empty($field));
                }
                if trimmed.chars().count() > Self::MAX_LEN {
                    return Err(ValueObjectError::TooLong {
                        field: $field,
                        max: Self::MAX_LEN,
                    });
                }
                if trimmed.len() == value.len() {
                    Ok(Self(value))
                } else {
                    Ok(Self(trimmed.to_string()))
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValueObjectError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

text_value_object!(
    /// Identity of a family member's safety report
    MemberId,
    "member id",
    128
);

text_value_object!(
    /// Identity of a chat message
    MessageId,
    "message id",
    128
);

text_value_object!(
    /// Display name chosen by a user
    UserName,
    "user name",
    64
);

text_value_object!(
    /// Reaction emoji (may be a multi-codepoint sequence)
    Emoji,
    "emoji",
    32
);

text_value_object!(
    /// Chat message text
    MessageBody,
    "message",
    4000
);

/// Identity of one open relay connection.
///
/// Assigned by the server, never by clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generates fresh connection ids
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4().to_string())
    }
}

/// Unix timestamp in milliseconds (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
