use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use log::{error, info};
use tokio::net::TcpListener;

use super::routes::status_routes;
use crate::configuration::types::StatusConfig;
use crate::error_handling::types::WebError;
use crate::storage::status_file::StatusFile;

/// Read-only HTTP service exposing the status file.
pub struct WebServer {
    status_file: Arc<StatusFile>,
}

impl WebServer {
    pub fn new(status_file: Arc<StatusFile>) -> Self {
        Self { status_file }
    }

    pub fn from_config(config: &StatusConfig) -> Self {
        Self::new(Arc::new(StatusFile::new(&config.status_file)))
    }

    /// Resolves the listening address from `bind_address` and `port`.
    pub fn socket_addr(bind_address: &str, port: u16) -> Result<SocketAddr, WebError> {
        let ip: IpAddr = bind_address
            .parse()
            .map_err(|e| WebError::InvalidAddress(format!("{}: {}", bind_address, e)))?;
        Ok(SocketAddr::new(ip, port))
    }

    /// Serves `/` and `/status_info` until the process stops.
    pub async fn start(&self, bind_address: &str, port: u16) -> Result<(), WebError> {
        let addr = Self::socket_addr(bind_address, port)?;
        let routes = status_routes(self.status_file.clone());

        let listener = TcpListener::bind(addr).await.map_err(|e| {
            error!("Unable to bind status server to {}: {}", addr, e);
            WebError::BindFailed(e)
        })?;

        info!(
            "Status server listening on http://{} (status file: {})",
            addr,
            self.status_file.path().display()
        );
        warp::serve(routes).incoming(listener).run().await;

        Ok(())
    }
}
