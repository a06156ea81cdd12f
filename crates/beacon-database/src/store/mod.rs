//! Persistent store abstraction.
//!
//! [`ChatStore`] is the single seam between the domain logic and storage.
//! Two implementations exist: [`PgChatStore`] backed by Postgres, and
//! [`MemoryChatStore`] for tests and throwaway local runs. The backend is
//! selected by the `database.backend` configuration key.

pub mod memory;
pub mod postgres;

pub use memory::MemoryChatStore;
pub use postgres::PgChatStore;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use beacon_core::config::DatabaseConfig;
use beacon_core::{AppError, AppResult, ConversationId, UserId};
use beacon_entity::{Conversation, Message, NewMessage, NewUser, User};
use tracing::info;

use crate::connection::DatabasePool;

#[async_trait]
pub trait ChatStore: fmt::Debug + Send + Sync + 'static {
    /// Inserts a new account. Fails with a conflict when the username or
    /// email is already taken.
    async fn create_user(&self, data: &NewUser) -> AppResult<User>;

    async fn find_user_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Email lookup is case-insensitive.
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Updates the durable online hint. Missing rows are ignored.
    async fn set_user_online(&self, id: UserId, online: bool) -> AppResult<()>;

    /// Looks up the conversation for a participant pair, in either order.
    async fn find_conversation_by_participants(
        &self,
        a: UserId,
        b: UserId,
    ) -> AppResult<Option<Conversation>>;

    /// Creates the conversation for a pair, seeding the last-message
    /// snapshot. If another writer created it concurrently, the existing
    /// row is returned with its snapshot refreshed instead of failing.
    async fn create_conversation(
        &self,
        a: UserId,
        b: UserId,
        first_message: &str,
    ) -> AppResult<Conversation>;

    async fn update_conversation_last_message(
        &self,
        id: ConversationId,
        text: &str,
    ) -> AppResult<()>;

    /// Conversations involving the user, most recent activity first.
    async fn find_conversations_by_user(&self, user: UserId) -> AppResult<Vec<Conversation>>;

    async fn create_message(&self, data: &NewMessage) -> AppResult<Message>;

    /// Messages of one conversation in send order (`seq` ascending).
    async fn find_messages_by_conversation(
        &self,
        conversation: ConversationId,
    ) -> AppResult<Vec<Message>>;

    async fn count_users(&self) -> AppResult<u64>;
    async fn count_online_users(&self) -> AppResult<u64>;
    async fn count_messages(&self) -> AppResult<u64>;

    async fn health_check(&self) -> AppResult<()>;
}

/// Owns the configured [`ChatStore`] implementation and, for the Postgres
/// backend, the underlying pool so migrations can run against it.
#[derive(Debug, Clone)]
pub struct StoreManager {
    inner: Arc<dyn ChatStore>,
    pool: Option<DatabasePool>,
}

impl StoreManager {
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.backend.as_str() {
            "postgres" => {
                let pool = DatabasePool::connect(config).await?;
                let store = PgChatStore::new(pool.pool().clone());
                Ok(Self {
                    inner: Arc::new(store),
                    pool: Some(pool),
                })
            }
            "memory" => {
                info!("using in-memory store; data is lost on shutdown");
                Ok(Self {
                    inner: Arc::new(MemoryChatStore::new()),
                    pool: None,
                })
            }
            other => Err(AppError::configuration(format!(
                "unknown store backend: {other}"
            ))),
        }
    }

    /// Wraps an already-built store. Used by tests.
    pub fn from_store(store: Arc<dyn ChatStore>) -> Self {
        Self {
            inner: store,
            pool: None,
        }
    }

    pub fn store(&self) -> Arc<dyn ChatStore> {
        Arc::clone(&self.inner)
    }

    pub fn pool(&self) -> Option<&DatabasePool> {
        self.pool.as_ref()
    }
}
