//! # beacon-auth
//!
//! Token issuance and verification, password hashing, and the
//! [`verifier::IdentityVerifier`] that turns a bearer token into an
//! authenticated [`verifier::Identity`].

pub mod jwt;
pub mod password;
pub mod verifier;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
pub use verifier::{Identity, IdentityVerifier};
