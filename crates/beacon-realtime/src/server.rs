use std::sync::Arc;

use beacon_core::config::RealtimeConfig;
use beacon_database::ChatStore;
use tokio::sync::broadcast;
use tracing::info;

use crate::connection::ConnectionSession;
use crate::delivery::DeliveryCoordinator;
use crate::presence::PresenceRegistry;

/// Shared realtime state: the presence registry and delivery coordinator,
/// plus a shutdown signal that connection tasks subscribe to.
#[derive(Debug, Clone)]
pub struct RealtimeEngine {
    registry: Arc<PresenceRegistry>,
    coordinator: Arc<DeliveryCoordinator>,
    config: RealtimeConfig,
    shutdown_tx: broadcast::Sender<()>,
}

impl RealtimeEngine {
    pub fn new(config: RealtimeConfig, store: Arc<dyn ChatStore>) -> Self {
        let registry = Arc::new(PresenceRegistry::new());
        let coordinator = Arc::new(DeliveryCoordinator::new(
            store,
            Arc::clone(&registry),
            &config,
        ));
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            registry,
            coordinator,
            config,
            shutdown_tx,
        }
    }

    /// Starts the lifecycle for a freshly upgraded socket.
    pub fn begin_session(&self) -> ConnectionSession {
        ConnectionSession::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.coordinator),
            self.config.event_buffer_size,
        )
    }

    pub fn registry(&self) -> &PresenceRegistry {
        &self.registry
    }

    pub fn coordinator(&self) -> &DeliveryCoordinator {
        &self.coordinator
    }

    pub fn connection_count(&self) -> usize {
        self.registry.connection_count()
    }

    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Tells connection tasks to stop and closes every live connection.
    pub fn shutdown(&self) {
        info!(
            connections = self.connection_count(),
            "realtime engine shutting down"
        );
        let _ = self.shutdown_tx.send(());
        self.registry.close_all();
    }
}
