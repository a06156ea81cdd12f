pub mod service;

pub use service::{ConversationSummary, HistoryService};
