//! # beacon-core
//!
//! Shared foundation for the Beacon messaging backend: configuration,
//! the unified error type, and strongly typed identifiers. Every other
//! crate in the workspace builds on this one.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, ErrorKind};
pub use result::AppResult;
pub use types::{ConnectionId, ConversationId, MessageId, UserId};
