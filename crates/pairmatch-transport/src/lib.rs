//! Transport abstraction layer for pairmatch.
//!
//! Provides the [`Transport`] and [`Connection`] traits. A connection is
//! split into an outbound [`FrameSender`] and an inbound [`FrameReceiver`]
//! so a writer task can push broadcasts while the reader task is parked
//! waiting for the client's next action.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{
    WebSocketConnection, WebSocketReceiver, WebSocketSender, WebSocketTransport,
};

use std::fmt;

/// Process-unique number assigned to each accepted socket.
///
/// The server reuses it as the client's channel id, so it must never be
/// handed out twice while the process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A listener handing out upgraded client connections.
pub trait Transport: Send + Sync + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next client and completes its upgrade.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;

    /// The bound address; useful after binding port 0.
    fn local_addr(&self) -> std::io::Result<std::net::SocketAddr>;
}

/// An upgraded client connection that has not been split yet.
pub trait Connection: Send + 'static {
    type Sender: FrameSender;
    type Receiver: FrameReceiver;

    fn id(&self) -> ConnectionId;

    /// Separates the write half (owned by the outbox writer task) from the
    /// read half (owned by the action loop).
    fn split(self) -> (Self::Sender, Self::Receiver);
}

/// Write half of a connection.
pub trait FrameSender: Send + 'static {
    type Error: std::error::Error + Send + Sync;

    /// Sends one frame. Valid UTF-8 goes out as a text frame, anything
    /// else as binary.
    async fn send(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Sends a close frame.
    async fn close(&mut self) -> Result<(), Self::Error>;
}

/// Read half of a connection.
pub trait FrameReceiver: Send + 'static {
    type Error: std::error::Error + Send + Sync;

    /// Next text or binary payload. Control frames are skipped; `Ok(None)`
    /// means the peer closed the socket.
    async fn recv(&mut self) -> Result<Option<Vec<u8>>, Self::Error>;
}
