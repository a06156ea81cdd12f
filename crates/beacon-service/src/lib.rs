//! # beacon-service
//!
//! Domain services sitting between the API surface and the store:
//! account lifecycle and message history reads.

pub mod context;
pub mod history;
pub mod user;

pub use context::RequestContext;
pub use history::{ConversationSummary, HistoryService};
pub use user::{AuthSession, UserService, UserStats};
