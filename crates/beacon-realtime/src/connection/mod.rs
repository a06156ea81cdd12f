pub mod handle;
pub mod session;

pub use handle::ConnectionHandle;
pub use session::{ConnectionSession, SessionState};
