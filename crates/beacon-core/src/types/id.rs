//! Strongly typed identifiers.
//!
//! Every record and every live connection is addressed by a UUID. Wrapping
//! the raw [`uuid::Uuid`] in distinct newtypes keeps a sender id from being
//! passed where a conversation id is expected.

/// Defines a UUID-backed identifier type with serde, display, and
/// (behind the `sqlx` feature) Postgres codec support.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            pub fn from_uuid(id: uuid::Uuid) -> Self {
                Self(id)
            }

            pub fn into_uuid(self) -> uuid::Uuid {
                self.0
            }

            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(uuid::Uuid::parse_str(s)?))
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(id: uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "sqlx")]
        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <uuid::Uuid as sqlx::Type<sqlx::Postgres>>::type_info()
            }
        }

        #[cfg(feature = "sqlx")]
        impl<'q> sqlx::Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <uuid::Uuid as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }

        #[cfg(feature = "sqlx")]
        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                Ok(Self(<uuid::Uuid as sqlx::Decode<'r, sqlx::Postgres>>::decode(
                    value,
                )?))
            }
        }
    };
}

define_id!(
    /// Identifies a registered user.
    UserId
);

define_id!(
    /// Identifies a conversation between two users.
    ConversationId
);

define_id!(
    /// Identifies a single message.
    MessageId
);

define_id!(
    /// Identifies one live socket connection. A user who reconnects gets a
    /// new connection id while keeping the same [`UserId`].
    ConnectionId
);

impl MessageId {
    /// Time-ordered identifier so primary-key order roughly follows
    /// insertion order.
    pub fn now_v7() -> Self {
        Self(uuid::Uuid::now_v7())
    }
}
