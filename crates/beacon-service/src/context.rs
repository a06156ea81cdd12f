use beacon_auth::Identity;
use beacon_core::UserId;
use chrono::{DateTime, Utc};

/// Per-request caller information, built by the API layer after
/// authentication.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user_id: UserId,
    pub username: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(
        identity: Identity,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            user_id: identity.user_id,
            username: identity.username,
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id,
            username: self.username.clone(),
        }
    }
}
