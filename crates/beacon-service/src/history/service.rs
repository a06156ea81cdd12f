use std::sync::Arc;

use beacon_core::{AppResult, ConversationId, UserId};
use beacon_database::ChatStore;
use beacon_entity::{Conversation, Message};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

/// One row in a user's conversation list, with the peer resolved to a
/// name.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub peer_id: UserId,
    pub peer_username: String,
    pub last_message_text: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Read side of messaging: per-peer history and conversation lists.
#[derive(Debug, Clone)]
pub struct HistoryService {
    store: Arc<dyn ChatStore>,
}

impl HistoryService {
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self { store }
    }

    /// Full history between the caller and a peer, oldest first. The
    /// result is identical no matter which side asks. No conversation
    /// yet simply means an empty history.
    pub async fn history_with_peer(&self, user: UserId, peer: UserId) -> AppResult<Vec<Message>> {
        match self
            .store
            .find_conversation_by_participants(user, peer)
            .await?
        {
            Some(conversation) => self.store.find_messages_by_conversation(conversation.id).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn conversations_for(&self, user: UserId) -> AppResult<Vec<ConversationSummary>> {
        let conversations = self.store.find_conversations_by_user(user).await?;

        let mut summaries = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            match self.resolve_summary(&conversation, user).await? {
                Some(summary) => summaries.push(summary),
                None => {
                    warn!(
                        conversation_id = %conversation.id,
                        "skipping conversation with unresolvable peer"
                    );
                }
            }
        }
        Ok(summaries)
    }

    async fn resolve_summary(
        &self,
        conversation: &Conversation,
        user: UserId,
    ) -> AppResult<Option<ConversationSummary>> {
        let Some(peer_id) = conversation.peer_of(user) else {
            return Ok(None);
        };
        let Some(peer) = self.store.find_user_by_id(peer_id).await? else {
            return Ok(None);
        };

        Ok(Some(ConversationSummary {
            id: conversation.id,
            peer_id,
            peer_username: peer.username,
            last_message_text: conversation.last_message_text.clone(),
            last_message_at: conversation.last_message_at,
            created_at: conversation.created_at,
        }))
    }
}
