use std::sync::atomic::{AtomicBool, Ordering};

use beacon_core::{ConnectionId, UserId};
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::event::ServerEvent;

/// Send side of one live connection.
///
/// Shared between the presence registry and the session that owns the
/// socket. `send` never blocks: a full queue drops the event, a closed
/// queue marks the handle dead.
#[derive(Debug)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    pub user_id: UserId,
    pub username: String,
    pub connected_at: DateTime<Utc>,
    sender: mpsc::Sender<ServerEvent>,
    open: AtomicBool,
}

impl ConnectionHandle {
    pub fn new(
        user_id: UserId,
        username: impl Into<String>,
        sender: mpsc::Sender<ServerEvent>,
    ) -> Self {
        Self {
            id: ConnectionId::new(),
            user_id,
            username: username.into(),
            connected_at: Utc::now(),
            sender,
            open: AtomicBool::new(true),
        }
    }

    /// Queues an event for the socket writer. Returns whether it was
    /// accepted.
    pub fn send(&self, event: ServerEvent) -> bool {
        if !self.is_open() {
            return false;
        }

        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(
                    connection_id = %self.id,
                    user_id = %self.user_id,
                    "outbound queue full, dropping event"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(connection_id = %self.id, "outbound channel closed");
                self.mark_closed();
                false
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn mark_closed(&self) {
        self.open.store(false, Ordering::SeqCst);
    }
}
