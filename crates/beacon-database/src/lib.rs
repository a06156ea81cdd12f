//! # beacon-database
//!
//! Storage layer: the [`store::ChatStore`] trait, its Postgres and
//! in-memory implementations, pool management, and migrations.

pub mod connection;
pub mod migration;
pub mod store;

pub use connection::DatabasePool;
pub use store::{ChatStore, MemoryChatStore, PgChatStore, StoreManager};
