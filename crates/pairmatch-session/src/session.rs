//! The per-connection session record.

use std::time::Instant;

use pairmatch_protocol::{ChannelId, Identity};

/// Whether a connection has identified itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Connected but not logged in. Only `login` and chat are accepted.
    Anonymous,

    /// Logged in as the given user.
    LoggedIn(Identity),
}

/// One live connection.
#[derive(Debug, Clone)]
pub struct Session {
    /// The connection this session belongs to.
    pub channel: ChannelId,

    /// Anonymous or logged in.
    pub state: SessionState,

    /// When the connection was accepted.
    pub connected_at: Instant,
}

impl Session {
    /// A fresh anonymous session.
    pub fn new(channel: ChannelId) -> Self {
        Self {
            channel,
            state: SessionState::Anonymous,
            connected_at: Instant::now(),
        }
    }

    /// The logged-in user, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            SessionState::LoggedIn(identity) => Some(identity),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }
}
