use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::dispatcher::Dispatcher;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// Media object graph server.
pub struct MogServer {
    config: ServerConfig,
    dispatcher: Arc<Dispatcher>,
}

impl MogServer {
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;
        let dispatcher = Arc::new(Dispatcher::from_config(&config)?);
        Ok(Self { config, dispatcher })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(Arc::clone(&self.dispatcher))
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            "media server listening on {} (endpoints at {})",
            self.config.bind_addr,
            self.config.http_base_url()
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
