use std::sync::Arc;

use beacon_auth::IdentityVerifier;
use beacon_core::AppConfig;
use beacon_database::ChatStore;
use beacon_realtime::RealtimeEngine;
use beacon_service::{HistoryService, UserService};

/// Shared application state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ChatStore>,
    pub verifier: Arc<IdentityVerifier>,
    pub user_service: Arc<UserService>,
    pub history_service: Arc<HistoryService>,
    pub realtime: Arc<RealtimeEngine>,
}
