use serde::Deserialize;

/// Token issuance and password policy.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for signing tokens. Override this outside development.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_jwt_ttl_hours")]
    pub jwt_ttl_hours: i64,
    #[serde(default = "default_password_min_length")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_ttl_hours: default_jwt_ttl_hours(),
            password_min_length: default_password_min_length(),
        }
    }
}

fn default_jwt_secret() -> String {
    "beacon-dev-secret-change-me".to_string()
}

fn default_jwt_ttl_hours() -> i64 {
    // One week, matching the session cookie lifetime.
    168
}

fn default_password_min_length() -> usize {
    8
}
