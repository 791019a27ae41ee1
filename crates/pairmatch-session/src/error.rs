//! Error types for the session layer.

use pairmatch_protocol::ChannelId;

/// Errors raised while tracking connection sessions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The connection has not logged in (or logged out again).
    #[error("connection {0} is not logged in")]
    NotAuthenticated(ChannelId),

    /// No session is open for the connection.
    #[error("no session for connection {0}")]
    UnknownChannel(ChannelId),

    /// A session is already open for the connection.
    #[error("connection {0} already has a session")]
    AlreadyOpen(ChannelId),
}
