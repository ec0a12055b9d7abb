pub(crate) mod schemas;
mod routes;
mod state;

use std::future::Future;
use std::sync::Arc;
use axum::Router;
use log::info;
use tokio::net::TcpListener;
use crate::backend::routes::api_routes;
use crate::backend::state::GatewayState;
use crate::service::SignatureClient;

/// HTTP front for the status and creation operations
pub struct Gateway {
    router: Router,
}

impl Gateway {
    pub fn new(client: SignatureClient) -> Self {
        let state = GatewayState::new(client);

        let router = Router::new()
            .merge(api_routes())
            .with_state(Arc::new(state));

        Self { router }
    }

    pub async fn serve(self, listener: TcpListener, shutdown: impl Future<Output = ()> + Send + 'static) -> anyhow::Result<()> {
        info!("Starting gateway on {}", listener.local_addr()?);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
