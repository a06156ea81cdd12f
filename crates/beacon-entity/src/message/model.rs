use beacon_core::{ConversationId, MessageId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single direct message.
///
/// `seq` is assigned by the store and is the authoritative ordering within
/// a conversation; timestamps can collide, sequence numbers cannot.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub body: String,
    pub seq: i64,
    pub created_at: DateTime<Utc>,
}

/// Payload for persisting a message. `seq` and timestamps come from the
/// store.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub body: String,
}
