//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::state::AppState;
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use crate::storage::InMemoryPolicyStore;
use papi_types::ConceptKey;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Policy API server
#[derive(Debug)]
pub struct Server {
    config: DaemonConfig,
    store: Arc<InMemoryPolicyStore>,
}

impl Server {
    /// Create a new server with the given configuration
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let preloaded = config
            .store
            .preloaded_policy_types
            .iter()
            .map(|entry| {
                entry
                    .parse::<ConceptKey>()
                    .map_err(|e| DaemonError::Config(e.to_string()))
            })
            .collect::<DaemonResult<Vec<_>>>()?;

        let store = Arc::new(InMemoryPolicyStore::with_preloaded(preloaded));

        Ok(Self { config, store })
    }

    /// Run the server
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        let state = AppState::new(self.store.clone());
        let app = create_router(state, self.config.server.enable_cors);

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Policy API daemon listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("Policy API daemon shutting down");

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::storage::PolicyStore;

    #[tokio::test]
    async fn preloaded_policy_type_keys_are_parsed_into_the_store() {
        let config = DaemonConfig {
            store: StoreConfig {
                preloaded_policy_types: vec!["onap.policies.Base:1.0.0".to_string()],
            },
            ..Default::default()
        };

        let server = Server::new(config).unwrap();
        assert!(server
            .store
            .is_preloaded_policy_type("onap.policies.Base", "1.0.0")
            .await
            .unwrap());
    }

    #[test]
    fn malformed_preloaded_keys_fail_bootstrap() {
        let config = DaemonConfig {
            store: StoreConfig {
                preloaded_policy_types: vec!["no-version".to_string()],
            },
            ..Default::default()
        };

        let err = Server::new(config).unwrap_err();
        assert!(err.to_string().contains("invalid concept key"));
    }
}
