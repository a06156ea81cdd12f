use beacon_core::{ConversationId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A two-party conversation.
///
/// The participant pair is stored in normalized order
/// (`participant_a < participant_b`), so one row exists per pair no matter
/// who wrote first. `last_message_text` and `last_message_at` are a
/// denormalized snapshot for conversation lists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    pub id: ConversationId,
    pub participant_a: UserId,
    pub participant_b: UserId,
    pub last_message_text: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Orders two participants the way the store keys them.
    pub fn normalized_pair(a: UserId, b: UserId) -> (UserId, UserId) {
        if a <= b { (a, b) } else { (b, a) }
    }

    pub fn involves(&self, user: UserId) -> bool {
        self.participant_a == user || self.participant_b == user
    }

    /// The other participant from `user`'s point of view.
    pub fn peer_of(&self, user: UserId) -> Option<UserId> {
        if self.participant_a == user {
            Some(self.participant_b)
        } else if self.participant_b == user {
            Some(self.participant_a)
        } else {
            None
        }
    }
}
