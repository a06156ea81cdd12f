use async_trait::async_trait;
use beacon_core::{AppError, AppResult, ConversationId, ErrorKind, MessageId, UserId};
use beacon_entity::{Conversation, Message, NewMessage, NewUser, User};
use sqlx::PgPool;

/// Postgres-backed [`super::ChatStore`].
///
/// Conversation rows rely on the unique index over the normalized
/// participant pair; concurrent first messages between the same two users
/// collapse onto one row via `ON CONFLICT`.
#[derive(Debug, Clone)]
pub struct PgChatStore {
    pool: PgPool,
}

impl PgChatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl super::ChatStore for PgChatStore {
    async fn create_user(&self, data: &NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(UserId::new())
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.constraint() == Some("users_username_key") => {
                AppError::conflict("Username is already taken")
            }
            sqlx::Error::Database(db_err) if db_err.constraint() == Some("users_email_key") => {
                AppError::conflict("Email is already registered")
            }
            _ => AppError::with_source(ErrorKind::Database, "failed to create user", e),
        })
    }

    async fn find_user_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "failed to load user", e))
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "failed to load user by email", e)
            })
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY LOWER(username) ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "failed to list users", e))
    }

    async fn set_user_online(&self, id: UserId, online: bool) -> AppResult<()> {
        sqlx::query("UPDATE users SET is_online = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(online)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "failed to update online flag", e)
            })?;
        Ok(())
    }

    async fn find_conversation_by_participants(
        &self,
        a: UserId,
        b: UserId,
    ) -> AppResult<Option<Conversation>> {
        let (lo, hi) = Conversation::normalized_pair(a, b);
        sqlx::query_as::<_, Conversation>(
            "SELECT * FROM conversations WHERE participant_a = $1 AND participant_b = $2",
        )
        .bind(lo)
        .bind(hi)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "failed to load conversation", e))
    }

    async fn create_conversation(
        &self,
        a: UserId,
        b: UserId,
        first_message: &str,
    ) -> AppResult<Conversation> {
        let (lo, hi) = Conversation::normalized_pair(a, b);
        sqlx::query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (id, participant_a, participant_b, last_message_text, last_message_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (participant_a, participant_b)
            DO UPDATE SET last_message_text = EXCLUDED.last_message_text,
                          last_message_at = EXCLUDED.last_message_at
            RETURNING *
            "#,
        )
        .bind(ConversationId::new())
        .bind(lo)
        .bind(hi)
        .bind(first_message)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "failed to create conversation", e)
        })
    }

    async fn update_conversation_last_message(
        &self,
        id: ConversationId,
        text: &str,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE conversations SET last_message_text = $2, last_message_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(text)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "failed to update conversation", e)
        })?;
        Ok(())
    }

    async fn find_conversations_by_user(&self, user: UserId) -> AppResult<Vec<Conversation>> {
        sqlx::query_as::<_, Conversation>(
            r#"
            SELECT * FROM conversations
            WHERE participant_a = $1 OR participant_b = $1
            ORDER BY last_message_at DESC NULLS LAST, created_at DESC
            "#,
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "failed to list conversations", e))
    }

    async fn create_message(&self, data: &NewMessage) -> AppResult<Message> {
        sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, receiver_id, body)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(MessageId::now_v7())
        .bind(data.conversation_id)
        .bind(data.sender_id)
        .bind(data.receiver_id)
        .bind(&data.body)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "failed to store message", e))
    }

    async fn find_messages_by_conversation(
        &self,
        conversation: ConversationId,
    ) -> AppResult<Vec<Message>> {
        sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE conversation_id = $1 ORDER BY seq ASC",
        )
        .bind(conversation)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "failed to load messages", e))
    }

    async fn count_users(&self) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "failed to count users", e))?;
        Ok(count as u64)
    }

    async fn count_online_users(&self) -> AppResult<u64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE is_online = TRUE")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "failed to count online users", e)
                })?;
        Ok(count as u64)
    }

    async fn count_messages(&self) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "failed to count messages", e)
            })?;
        Ok(count as u64)
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "database health check failed", e)
            })?;
        Ok(())
    }
}
