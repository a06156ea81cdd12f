use std::sync::Arc;

use beacon_core::{ConnectionId, UserId};
use dashmap::DashMap;
use tracing::{debug, info};

use crate::connection::handle::ConnectionHandle;
use crate::event::{Peer, ServerEvent};

/// Live connections keyed by user.
///
/// At most one connection per user: registering a newer connection
/// displaces and closes the previous one. Removal is guarded by
/// connection id, so a disconnect that races a reconnect can never knock
/// the newer connection out. Lookups never block on other users'
/// activity.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    connections: DashMap<UserId, Arc<ConnectionHandle>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection and announces the change: the full online
    /// roster to everyone, and a join notice to everyone else. Returns
    /// the displaced connection when the user was already connected.
    pub fn register(&self, handle: Arc<ConnectionHandle>) -> Option<Arc<ConnectionHandle>> {
        let user_id = handle.user_id;
        let username = handle.username.clone();

        let displaced = self.connections.insert(user_id, Arc::clone(&handle));
        if let Some(old) = &displaced {
            old.mark_closed();
            debug!(
                user_id = %user_id,
                old_connection = %old.id,
                new_connection = %handle.id,
                "connection superseded"
            );
        }
        info!(user_id = %user_id, username = %username, "user connected");

        self.broadcast(ServerEvent::OnlineUsers {
            users: self.online_users(),
        });
        self.broadcast_except(user_id, ServerEvent::UserJoined { user_id, username });

        displaced
    }

    /// Removes the connection only if it is still the user's current
    /// one. A stale unregister from a superseded connection is a no-op
    /// and nothing is announced.
    pub fn unregister(&self, user_id: UserId, connection_id: ConnectionId) -> bool {
        let removed = self
            .connections
            .remove_if(&user_id, |_, handle| handle.id == connection_id);

        match removed {
            Some((_, handle)) => {
                handle.mark_closed();
                info!(user_id = %user_id, username = %handle.username, "user disconnected");
                self.broadcast(ServerEvent::OnlineUsers {
                    users: self.online_users(),
                });
                self.broadcast_except(
                    user_id,
                    ServerEvent::UserLeft {
                        user_id,
                        username: handle.username.clone(),
                    },
                );
                true
            }
            None => {
                debug!(
                    user_id = %user_id,
                    connection_id = %connection_id,
                    "stale unregister ignored"
                );
                false
            }
        }
    }

    /// Current connection for a user, if any.
    pub fn lookup(&self, user_id: UserId) -> Option<Arc<ConnectionHandle>> {
        self.connections
            .get(&user_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn is_online(&self, user_id: UserId) -> bool {
        self.connections.contains_key(&user_id)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Roster snapshot, sorted by username for stable output.
    pub fn online_users(&self) -> Vec<Peer> {
        let mut users: Vec<Peer> = self
            .connections
            .iter()
            .map(|entry| Peer {
                user_id: entry.value().user_id,
                username: entry.value().username.clone(),
            })
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users
    }

    pub fn broadcast(&self, event: ServerEvent) {
        for entry in self.connections.iter() {
            entry.value().send(event.clone());
        }
    }

    pub fn broadcast_except(&self, skip: UserId, event: ServerEvent) {
        for entry in self.connections.iter() {
            if entry.value().user_id != skip {
                entry.value().send(event.clone());
            }
        }
    }

    /// Closes and forgets every connection. Used at shutdown.
    pub fn close_all(&self) {
        for entry in self.connections.iter() {
            entry.value().mark_closed();
        }
        self.connections.clear();
    }
}
