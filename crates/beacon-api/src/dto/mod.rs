//! Request and response shapes for the REST surface.

pub mod request;
pub mod response;

pub use request::{LoginRequest, RegisterRequest, SendMessageRequest};
pub use response::{
    ApiResponse, AuthResponse, HealthResponse, MessageResponse, StatsResponse, UserResponse,
};
