use std::sync::Arc;

use beacon_auth::Identity;
use beacon_core::{AppError, AppResult};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::connection::handle::ConnectionHandle;
use crate::delivery::DeliveryCoordinator;
use crate::event::{ClientEvent, ServerEvent};
use crate::presence::PresenceRegistry;

/// Lifecycle phase of one socket connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Socket is up, credentials not yet checked.
    Connecting,
    /// Credentials verified, not yet visible to other users.
    Authenticated,
    /// Registered in presence and processing events.
    Active,
    /// Finished. Terminal; a reconnect is a brand-new session.
    Closed,
}

/// Drives one connection from handshake to teardown.
///
/// Transitions only move forward. Activation registers the connection
/// and kicks off the durable online-flag write; closing reverses both,
/// but only while this session is still the user's current connection.
#[derive(Debug)]
pub struct ConnectionSession {
    state: SessionState,
    identity: Option<Identity>,
    handle: Option<Arc<ConnectionHandle>>,
    registry: Arc<PresenceRegistry>,
    coordinator: Arc<DeliveryCoordinator>,
    event_buffer_size: usize,
}

impl ConnectionSession {
    pub(crate) fn new(
        registry: Arc<PresenceRegistry>,
        coordinator: Arc<DeliveryCoordinator>,
        event_buffer_size: usize,
    ) -> Self {
        Self {
            state: SessionState::Connecting,
            identity: None,
            handle: None,
            registry,
            coordinator,
            event_buffer_size,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Attaches the verified identity. Valid only while connecting.
    pub fn authenticate(&mut self, identity: Identity) -> AppResult<()> {
        if self.state != SessionState::Connecting {
            return Err(AppError::internal("session is already authenticated"));
        }

        debug!(user_id = %identity.user_id, "session authenticated");
        self.identity = Some(identity);
        self.state = SessionState::Authenticated;
        Ok(())
    }

    /// Registers with presence and starts the best-effort online-flag
    /// write. Returns the outbound event stream to pump into the socket.
    pub fn activate(&mut self) -> AppResult<mpsc::Receiver<ServerEvent>> {
        if self.state != SessionState::Authenticated {
            return Err(AppError::internal("session is not ready to activate"));
        }
        let identity = self
            .identity
            .as_ref()
            .ok_or_else(|| AppError::internal("session has no identity"))?;

        let (tx, rx) = mpsc::channel(self.event_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(
            identity.user_id,
            identity.username.clone(),
            tx,
        ));
        self.registry.register(Arc::clone(&handle));
        self.coordinator.set_online_flag(identity.user_id, true);

        self.handle = Some(handle);
        self.state = SessionState::Active;
        Ok(rx)
    }

    /// Handles one inbound client event. Anything arriving outside the
    /// active state is dropped.
    pub async fn handle_event(&self, event: ClientEvent) {
        if self.state != SessionState::Active {
            warn!(state = ?self.state, "dropping event on inactive session");
            return;
        }
        let (Some(identity), Some(handle)) = (self.identity.as_ref(), self.handle.as_ref())
        else {
            return;
        };

        match event {
            ClientEvent::Send { receiver_id, body } => {
                match self
                    .coordinator
                    .send_message(identity, receiver_id, &body)
                    .await
                {
                    Ok(payload) => {
                        handle.send(ServerEvent::MessageAccepted { message: payload });
                    }
                    Err(error) => {
                        debug!(user_id = %identity.user_id, %error, "send rejected");
                        handle.send(ServerEvent::Error {
                            reason: error.message.clone(),
                        });
                    }
                }
            }
            ClientEvent::Typing { receiver_id } => {
                self.coordinator.typing(identity, receiver_id);
            }
        }
    }

    /// Reports a protocol-level problem (for example an unparseable
    /// frame) back to the client without ending the session.
    pub fn report_error(&self, reason: impl Into<String>) {
        if let Some(handle) = self.handle.as_ref() {
            handle.send(ServerEvent::Error {
                reason: reason.into(),
            });
        }
    }

    /// Whether this session's connection is still the user's current one.
    pub fn is_open(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| h.is_open())
    }

    /// Tears the session down. Presence and the durable flag are only
    /// touched while this is still the user's current connection; a
    /// session closed after being superseded leaves the newer one alone.
    /// Idempotent.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        let was_active = self.state == SessionState::Active;
        self.state = SessionState::Closed;
        if !was_active {
            return;
        }

        if let (Some(identity), Some(handle)) = (self.identity.as_ref(), self.handle.as_ref()) {
            if self.registry.unregister(identity.user_id, handle.id) {
                self.coordinator.set_online_flag(identity.user_id, false);
            } else {
                debug!(
                    user_id = %identity.user_id,
                    connection_id = %handle.id,
                    "session closed after being superseded"
                );
            }
            handle.mark_closed();
        }
    }
}
