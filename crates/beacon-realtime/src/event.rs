//! Wire events.
//!
//! Everything on the socket is a JSON object tagged by `type`. Client
//! events arrive as text frames; server events leave the same way.

use beacon_auth::Identity;
use beacon_core::{ConversationId, MessageId, UserId};
use beacon_entity::{Message, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user as events refer to one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Peer {
    pub user_id: UserId,
    pub username: String,
}

impl Peer {
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            user_id: identity.user_id,
            username: identity.username.clone(),
        }
    }

    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Events a client may send.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Send a direct message.
    Send { receiver_id: UserId, body: String },
    /// Notify the receiver that the sender is typing.
    Typing { receiver_id: UserId },
}

/// A delivered message as both sides see it on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePayload {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender: Peer,
    pub receiver: Peer,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl MessagePayload {
    pub fn new(message: &Message, sender: Peer, receiver: Peer) -> Self {
        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            sender,
            receiver,
            body: message.body.clone(),
            created_at: message.created_at,
        }
    }
}

/// Events the server pushes to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Full roster of currently connected users. Sent to everyone when
    /// the roster changes.
    OnlineUsers { users: Vec<Peer> },
    /// Someone came online. Not sent to the user themselves.
    UserJoined { user_id: UserId, username: String },
    /// Someone went offline. Not sent to the user themselves.
    UserLeft { user_id: UserId, username: String },
    /// A message addressed to this connection's user.
    NewMessage { message: MessagePayload },
    /// Acknowledgement to the sender that their message was stored.
    MessageAccepted { message: MessagePayload },
    /// The named user is typing to this connection's user.
    UserTyping { user_id: UserId, username: String },
    /// A request failed; the session stays open.
    Error { reason: String },
}
