pub mod service;

pub use service::{AuthSession, UserService, UserStats};
