//! The session manager: tracks every open connection and who it is.
//!
//! Like the rest of the server state it is a plain `HashMap` owned by the
//! orchestrator task; it is never shared across threads.

use std::collections::HashMap;

use pairmatch_protocol::{ChannelId, Identity};

use crate::{Session, SessionError, SessionState};

/// Registry of open sessions, keyed by connection.
///
/// One user may hold several sessions (one per browser tab); each is
/// tracked independently.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: HashMap<ChannelId, Session>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an anonymous session for a freshly accepted connection.
    ///
    /// # Errors
    /// [`SessionError::AlreadyOpen`] if the channel already has one.
    pub fn open(&mut self, channel: ChannelId) -> Result<(), SessionError> {
        if self.sessions.contains_key(&channel) {
            return Err(SessionError::AlreadyOpen(channel));
        }
        self.sessions.insert(channel, Session::new(channel));
        tracing::debug!(%channel, "session opened");
        Ok(())
    }

    /// Attaches `identity` to the session. Logging in again replaces the
    /// previous identity, which is returned.
    pub fn login(
        &mut self,
        channel: ChannelId,
        identity: Identity,
    ) -> Result<Option<Identity>, SessionError> {
        let session = self
            .sessions
            .get_mut(&channel)
            .ok_or(SessionError::UnknownChannel(channel))?;

        tracing::info!(%channel, user = %identity.id, name = %identity.name, "logged in");
        let previous = std::mem::replace(&mut session.state, SessionState::LoggedIn(identity));
        Ok(match previous {
            SessionState::LoggedIn(old) => Some(old),
            SessionState::Anonymous => None,
        })
    }

    /// Drops the identity and returns it. The session stays open.
    ///
    /// # Errors
    /// [`SessionError::NotAuthenticated`] if the session is anonymous.
    pub fn logout(&mut self, channel: ChannelId) -> Result<Identity, SessionError> {
        let session = self
            .sessions
            .get_mut(&channel)
            .ok_or(SessionError::UnknownChannel(channel))?;

        match std::mem::replace(&mut session.state, SessionState::Anonymous) {
            SessionState::LoggedIn(identity) => {
                tracing::info!(%channel, user = %identity.id, "logged out");
                Ok(identity)
            }
            SessionState::Anonymous => Err(SessionError::NotAuthenticated(channel)),
        }
    }

    /// Removes the session when the connection goes away.
    pub fn close(&mut self, channel: ChannelId) -> Option<Session> {
        let session = self.sessions.remove(&channel);
        if let Some(session) = &session {
            tracing::debug!(
                %channel,
                authenticated = session.is_authenticated(),
                "session closed"
            );
        }
        session
    }

    /// The identity behind `channel`.
    ///
    /// # Errors
    /// - [`SessionError::UnknownChannel`] if no session is open.
    /// - [`SessionError::NotAuthenticated`] if it never logged in.
    pub fn identity(&self, channel: ChannelId) -> Result<&Identity, SessionError> {
        self.sessions
            .get(&channel)
            .ok_or(SessionError::UnknownChannel(channel))?
            .identity()
            .ok_or(SessionError::NotAuthenticated(channel))
    }

    pub fn get(&self, channel: ChannelId) -> Option<&Session> {
        self.sessions.get(&channel)
    }

    /// Every open connection, logged in or not.
    pub fn channels(&self) -> impl Iterator<Item = ChannelId> + '_ {
        self.sessions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
