//! # beacon-entity
//!
//! Domain records persisted by the store: users, conversations, and
//! messages.

pub mod conversation;
pub mod message;
pub mod user;

pub use conversation::Conversation;
pub use message::{Message, NewMessage};
pub use user::{NewUser, User};
