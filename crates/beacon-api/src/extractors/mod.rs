mod auth;

pub use auth::AuthUser;
pub(crate) use auth::token_from_headers;
