//! The orchestrator actor: a single Tokio task that owns all server state.
//!
//! Connection tasks talk to it through an [`OrchestratorHandle`]. Commands
//! are processed strictly one at a time in arrival order; actions that
//! expect an answer carry a `oneshot` reply channel.

use pairmatch_engine::EngineConfig;
use pairmatch_protocol::{ChannelId, ClientAction, GameId};
use tokio::sync::{mpsc, oneshot};

use crate::events::AckResponse;
use crate::orchestrator::{Orchestrator, Outbox};
use crate::OrchestratorError;

/// Commands sent to the orchestrator task.
pub(crate) enum OrchestratorCommand {
    /// Register a freshly accepted connection and its outbox.
    Connect { channel: ChannelId, outbox: Outbox },

    /// Run one client action and reply with its acknowledgment value.
    Action {
        channel: ChannelId,
        action: ClientAction,
        reply: oneshot::Sender<Result<AckResponse, OrchestratorError>>,
    },

    /// The connection is gone: withdraw offers, interrupt games, forget it.
    Disconnect { channel: ChannelId },

    /// A mismatch lock window elapsed for the game stamped `generation`.
    FlipBack { game_id: GameId, generation: u64 },
}

/// Handle to the running orchestrator.
///
/// Cheap to clone: it is just an `mpsc::Sender`. The task stops once every
/// handle has been dropped.
#[derive(Clone)]
pub struct OrchestratorHandle {
    sender: mpsc::Sender<OrchestratorCommand>,
}

impl OrchestratorHandle {
    /// Registers a connection. Broadcasts for it are pushed into `outbox`.
    pub async fn connect(&self, channel: ChannelId, outbox: Outbox) -> Result<(), OrchestratorError> {
        self.sender
            .send(OrchestratorCommand::Connect { channel, outbox })
            .await
            .map_err(|_| OrchestratorError::Unavailable)
    }

    /// Runs `action` on behalf of `channel` and waits for the result.
    pub async fn dispatch(
        &self,
        channel: ChannelId,
        action: ClientAction,
    ) -> Result<AckResponse, OrchestratorError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(OrchestratorCommand::Action {
                channel,
                action,
                reply: reply_tx,
            })
            .await
            .map_err(|_| OrchestratorError::Unavailable)?;
        reply_rx.await.map_err(|_| OrchestratorError::Unavailable)?
    }

    /// Tells the orchestrator the connection is gone.
    pub async fn disconnect(&self, channel: ChannelId) -> Result<(), OrchestratorError> {
        self.sender
            .send(OrchestratorCommand::Disconnect { channel })
            .await
            .map_err(|_| OrchestratorError::Unavailable)
    }
}

#[cfg(test)]
impl OrchestratorHandle {
    /// A handle whose commands go to `sender` instead of a real actor.
    pub(crate) fn from_sender(sender: mpsc::Sender<OrchestratorCommand>) -> Self {
        Self { sender }
    }
}

struct OrchestratorActor {
    state: Orchestrator,
    receiver: mpsc::Receiver<OrchestratorCommand>,
}

impl OrchestratorActor {
    async fn run(mut self) {
        tracing::info!("orchestrator started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                OrchestratorCommand::Connect { channel, outbox } => {
                    self.state.connect(channel, outbox);
                }
                OrchestratorCommand::Action {
                    channel,
                    action,
                    reply,
                } => {
                    let name = action.name();
                    let result = self.state.dispatch(channel, action);
                    if let Err(e) = &result {
                        tracing::debug!(%channel, action = name, error = %e, "action rejected");
                    }
                    let _ = reply.send(result);
                }
                OrchestratorCommand::Disconnect { channel } => {
                    self.state.disconnect(channel);
                }
                OrchestratorCommand::FlipBack {
                    game_id,
                    generation,
                } => {
                    self.state.flip_back(game_id, generation);
                }
            }
        }

        tracing::info!("orchestrator stopped");
    }
}

/// Spawns the orchestrator task and returns a handle to it.
///
/// `buffer` bounds the command queue; senders wait when it is full.
pub fn spawn_orchestrator(config: EngineConfig, buffer: usize) -> OrchestratorHandle {
    let (sender, receiver) = mpsc::channel(buffer.max(1));
    let actor = OrchestratorActor {
        state: Orchestrator::new(config, sender.downgrade()),
        receiver,
    };
    tokio::spawn(actor.run());
    OrchestratorHandle { sender }
}
