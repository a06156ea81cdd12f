use std::sync::Arc;

use beacon_auth::Identity;
use beacon_core::config::RealtimeConfig;
use beacon_core::{AppError, AppResult, UserId};
use beacon_database::ChatStore;
use beacon_entity::NewMessage;
use tracing::{debug, warn};

use crate::event::{MessagePayload, Peer, ServerEvent};
use crate::presence::PresenceRegistry;

/// Write side of messaging: validate, persist, then push live.
///
/// Persistence always comes first. Whether the receiver is connected only
/// decides if a `new_message` event goes out; it never affects the
/// outcome reported to the sender.
#[derive(Debug, Clone)]
pub struct DeliveryCoordinator {
    store: Arc<dyn ChatStore>,
    registry: Arc<PresenceRegistry>,
    max_message_length: usize,
}

impl DeliveryCoordinator {
    pub fn new(
        store: Arc<dyn ChatStore>,
        registry: Arc<PresenceRegistry>,
        config: &RealtimeConfig,
    ) -> Self {
        Self {
            store,
            registry,
            max_message_length: config.max_message_length,
        }
    }

    /// Persists a message and hands it to the receiver's connection when
    /// there is one. An offline receiver is not an error; they will find
    /// the message in history. The returned payload doubles as the
    /// sender's acknowledgement.
    pub async fn send_message(
        &self,
        sender: &Identity,
        receiver_id: UserId,
        body: &str,
    ) -> AppResult<MessagePayload> {
        let body = body.trim();
        if body.is_empty() {
            return Err(AppError::validation("Message body is required"));
        }
        if body.chars().count() > self.max_message_length {
            return Err(AppError::validation(format!(
                "Message exceeds {} characters",
                self.max_message_length
            )));
        }
        if receiver_id == sender.user_id {
            return Err(AppError::validation("Cannot send a message to yourself"));
        }

        let receiver = self
            .store
            .find_user_by_id(receiver_id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipient not found"))?;

        let conversation = match self
            .store
            .find_conversation_by_participants(sender.user_id, receiver_id)
            .await?
        {
            Some(conversation) => {
                self.store
                    .update_conversation_last_message(conversation.id, body)
                    .await?;
                conversation
            }
            None => {
                self.store
                    .create_conversation(sender.user_id, receiver_id, body)
                    .await?
            }
        };

        let message = self
            .store
            .create_message(&NewMessage {
                conversation_id: conversation.id,
                sender_id: sender.user_id,
                receiver_id,
                body: body.to_string(),
            })
            .await?;

        let payload = MessagePayload::new(
            &message,
            Peer::from_identity(sender),
            Peer::from_user(&receiver),
        );

        match self.registry.lookup(receiver_id) {
            Some(handle) => {
                handle.send(ServerEvent::NewMessage {
                    message: payload.clone(),
                });
                debug!(message_id = %message.id, receiver_id = %receiver_id, "delivered live");
            }
            None => {
                debug!(message_id = %message.id, receiver_id = %receiver_id, "receiver offline, stored only");
            }
        }

        Ok(payload)
    }

    /// Forwards a typing notice when the receiver is connected; otherwise
    /// it evaporates. Nothing is persisted and no failure is reported.
    pub fn typing(&self, sender: &Identity, receiver_id: UserId) {
        if receiver_id == sender.user_id {
            return;
        }
        if let Some(handle) = self.registry.lookup(receiver_id) {
            handle.send(ServerEvent::UserTyping {
                user_id: sender.user_id,
                username: sender.username.clone(),
            });
        }
    }

    /// Best-effort write of the durable online flag. Runs detached so a
    /// slow or failing store can never block or break a session; a
    /// failure is logged and forgotten.
    pub fn set_online_flag(&self, user_id: UserId, online: bool) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(error) = store.set_user_online(user_id, online).await {
                warn!(user_id = %user_id, online, %error, "failed to update online flag");
            }
        });
    }
}
