//! # beacon-realtime
//!
//! The live half of Beacon: who is connected, and pushing events to
//! them. The [`presence::PresenceRegistry`] maps each user to their one
//! current connection, the [`delivery::DeliveryCoordinator`] persists
//! messages and forwards them to connected receivers, and a
//! [`connection::ConnectionSession`] walks every socket through
//! authenticate, activate, and close.

pub mod connection;
pub mod delivery;
pub mod event;
pub mod presence;
pub mod server;

pub use connection::{ConnectionHandle, ConnectionSession, SessionState};
pub use delivery::DeliveryCoordinator;
pub use event::{ClientEvent, MessagePayload, Peer, ServerEvent};
pub use presence::PresenceRegistry;
pub use server::RealtimeEngine;
