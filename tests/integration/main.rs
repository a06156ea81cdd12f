//! Integration tests exercising the full HTTP and websocket surface
//! against the in-memory store.

mod helpers;

mod auth_test;
mod message_test;
mod user_test;
mod ws_test;
