//! # pairmatch
//!
//! Realtime session server for two-player memory-matching games.
//!
//! Browser clients connect over WebSocket, log in with an identity they
//! already hold, post and join game offers in a shared lobby, and play
//! turn-based matching games whose rules are enforced server side. One
//! orchestrator task owns all state; connection tasks talk to it through
//! an [`OrchestratorHandle`].
//!
//! ```text
//! WebSocket ──→ handler task ──→ OrchestratorHandle ──→ orchestrator task
//!                    ↑                                     │ Lobby
//!                    └──────── outbox (ServerFrame) ───────┤ Sessions
//!                                                          │ Rooms + Games
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pairmatch::prelude::*;
//!
//! # async fn start() -> Result<(), PairmatchError> {
//! let server = PairmatchServer::builder()
//!     .config(ServerConfig::from_env())
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod actor;
mod config;
mod error;
mod events;
mod handler;
mod orchestrator;
mod rooms;
mod server;

pub use actor::{OrchestratorHandle, spawn_orchestrator};
pub use config::ServerConfig;
pub use error::{OrchestratorError, PairmatchError};
pub use events::{AckResponse, ChatLine, QuitNotice, ServerEvent, ServerFrame};
pub use orchestrator::Outbox;
pub use server::{PairmatchServer, PairmatchServerBuilder};

pub use pairmatch_engine::{EngineConfig, Game, GameError, GameStatus, PlayerSlot, Slot};
pub use pairmatch_lobby::Offer;
pub use pairmatch_protocol::{
    AckError, ChannelId, ClientAction, ClientEnvelope, ErrorCode, GameId, Identity, Pairing,
    PlayRequest, PrivateMessage, UserId,
};

/// Everything needed to run a server or drive the orchestrator directly.
pub mod prelude {
    pub use crate::{
        AckResponse, ChannelId, ClientAction, EngineConfig, ErrorCode, GameId, Identity,
        OrchestratorError, OrchestratorHandle, PairmatchError, PairmatchServer, ServerConfig,
        ServerEvent, ServerFrame, spawn_orchestrator,
    };
}
