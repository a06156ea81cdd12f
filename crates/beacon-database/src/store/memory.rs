use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{self, AtomicI64};

use async_trait::async_trait;
use beacon_core::{AppError, AppResult, ConversationId, MessageId, UserId};
use beacon_entity::{Conversation, Message, NewMessage, NewUser, User};
use chrono::Utc;
use tokio::sync::RwLock;

/// In-memory [`super::ChatStore`] with the same observable behavior as the
/// Postgres backend: case-insensitive uniqueness, one conversation per
/// pair, and monotonically increasing message sequence numbers.
#[derive(Debug)]
pub struct MemoryChatStore {
    users: RwLock<HashMap<UserId, User>>,
    conversations: RwLock<HashMap<ConversationId, Conversation>>,
    messages: RwLock<Vec<Message>>,
    next_seq: AtomicI64,
}

impl MemoryChatStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            conversations: RwLock::new(HashMap::new()),
            messages: RwLock::new(Vec::new()),
            next_seq: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryChatStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl super::ChatStore for MemoryChatStore {
    async fn create_user(&self, data: &NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        for existing in users.values() {
            if existing.username.eq_ignore_ascii_case(&data.username) {
                return Err(AppError::conflict("Username is already taken"));
            }
            if existing.email.eq_ignore_ascii_case(&data.email) {
                return Err(AppError::conflict("Email is already registered"));
            }
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            username: data.username.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            is_online: false,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.username.to_lowercase());
        Ok(users)
    }

    async fn set_user_online(&self, id: UserId, online: bool) -> AppResult<()> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.is_online = online;
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn find_conversation_by_participants(
        &self,
        a: UserId,
        b: UserId,
    ) -> AppResult<Option<Conversation>> {
        let (lo, hi) = Conversation::normalized_pair(a, b);
        Ok(self
            .conversations
            .read()
            .await
            .values()
            .find(|c| c.participant_a == lo && c.participant_b == hi)
            .cloned())
    }

    async fn create_conversation(
        &self,
        a: UserId,
        b: UserId,
        first_message: &str,
    ) -> AppResult<Conversation> {
        let (lo, hi) = Conversation::normalized_pair(a, b);
        let now = Utc::now();

        // The write lock serializes racing creators, so the second one
        // lands on the refresh branch just like `ON CONFLICT` in Postgres.
        let mut conversations = self.conversations.write().await;
        if let Some(existing) = conversations
            .values_mut()
            .find(|c| c.participant_a == lo && c.participant_b == hi)
        {
            existing.last_message_text = Some(first_message.to_string());
            existing.last_message_at = Some(now);
            return Ok(existing.clone());
        }

        let conversation = Conversation {
            id: ConversationId::new(),
            participant_a: lo,
            participant_b: hi,
            last_message_text: Some(first_message.to_string()),
            last_message_at: Some(now),
            created_at: now,
        };
        conversations.insert(conversation.id, conversation.clone());
        Ok(conversation)
    }

    async fn update_conversation_last_message(
        &self,
        id: ConversationId,
        text: &str,
    ) -> AppResult<()> {
        if let Some(conversation) = self.conversations.write().await.get_mut(&id) {
            conversation.last_message_text = Some(text.to_string());
            conversation.last_message_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn find_conversations_by_user(&self, user: UserId) -> AppResult<Vec<Conversation>> {
        let mut list: Vec<Conversation> = self
            .conversations
            .read()
            .await
            .values()
            .filter(|c| c.involves(user))
            .cloned()
            .collect();
        list.sort_by(|a, b| {
            // Most recent activity first; conversations without messages
            // sink to the end.
            match (a.last_message_at, b.last_message_at) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => b.created_at.cmp(&a.created_at),
            }
        });
        Ok(list)
    }

    async fn create_message(&self, data: &NewMessage) -> AppResult<Message> {
        let seq = self.next_seq.fetch_add(1, atomic::Ordering::SeqCst);
        let message = Message {
            id: MessageId::now_v7(),
            conversation_id: data.conversation_id,
            sender_id: data.sender_id,
            receiver_id: data.receiver_id,
            body: data.body.clone(),
            seq,
            created_at: Utc::now(),
        };
        self.messages.write().await.push(message.clone());
        Ok(message)
    }

    async fn find_messages_by_conversation(
        &self,
        conversation: ConversationId,
    ) -> AppResult<Vec<Message>> {
        let mut list: Vec<Message> = self
            .messages
            .read()
            .await
            .iter()
            .filter(|m| m.conversation_id == conversation)
            .cloned()
            .collect();
        list.sort_by_key(|m| m.seq);
        Ok(list)
    }

    async fn count_users(&self) -> AppResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }

    async fn count_online_users(&self) -> AppResult<u64> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.is_online)
            .count() as u64)
    }

    async fn count_messages(&self) -> AppResult<u64> {
        Ok(self.messages.read().await.len() as u64)
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}
