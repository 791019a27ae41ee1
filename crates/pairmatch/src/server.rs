//! `PairmatchServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → orchestrator.

use std::time::Duration;

use pairmatch_engine::EngineConfig;
use pairmatch_protocol::JsonCodec;
use pairmatch_transport::{Transport, WebSocketTransport};

use crate::actor::{OrchestratorHandle, spawn_orchestrator};
use crate::handler::handle_connection;
use crate::{PairmatchError, ServerConfig};

/// Builder for configuring and starting a pairmatch server.
///
/// # Example
///
/// ```rust,no_run
/// use pairmatch::prelude::*;
///
/// # async fn start() -> Result<(), PairmatchError> {
/// let server = PairmatchServer::builder()
///     .bind("0.0.0.0:8086")
///     .flip_back_delay(std::time::Duration::from_millis(1500))
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct PairmatchServerBuilder {
    config: ServerConfig,
}

impl PairmatchServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Replaces the whole configuration, e.g. with [`ServerConfig::from_env`].
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the game rule tunables.
    pub fn engine(mut self, engine: EngineConfig) -> Self {
        self.config.engine = engine;
        self
    }

    /// Sets how long a mismatched pair stays face up.
    pub fn flip_back_delay(mut self, delay: Duration) -> Self {
        self.config.engine.flip_back_delay = delay;
        self
    }

    /// Fixes the board shuffle seed.
    pub fn shuffle_seed(mut self, seed: u64) -> Self {
        self.config.engine.shuffle_seed = Some(seed);
        self
    }

    /// Sets the orchestrator command queue capacity.
    pub fn command_buffer(mut self, capacity: usize) -> Self {
        self.config.command_buffer = capacity;
        self
    }

    /// Binds the listener and starts the orchestrator.
    pub async fn build(self) -> Result<PairmatchServer, PairmatchError> {
        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;
        let orchestrator = spawn_orchestrator(self.config.engine, self.config.command_buffer);
        Ok(PairmatchServer {
            transport,
            orchestrator,
            codec: JsonCodec,
        })
    }
}

impl Default for PairmatchServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound pairmatch server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct PairmatchServer {
    transport: WebSocketTransport,
    orchestrator: OrchestratorHandle,
    codec: JsonCodec,
}

impl PairmatchServer {
    /// Creates a new builder.
    pub fn builder() -> PairmatchServerBuilder {
        PairmatchServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop until the process is terminated.
    ///
    /// Each accepted connection is handled on its own task. A failed accept
    /// (including a failed WebSocket handshake) is logged and skipped.
    pub async fn run(mut self) -> Result<(), PairmatchError> {
        tracing::info!("pairmatch server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let orchestrator = self.orchestrator.clone();
                    let codec = self.codec;
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, orchestrator, codec).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
