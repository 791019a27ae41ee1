//! Wire protocol for pairmatch.
//!
//! This crate defines the "language" that browser clients and the session
//! server speak:
//!
//! - **Types** ([`UserId`], [`GameId`], [`ChannelId`], [`Identity`],
//!   [`Pairing`]): the identifiers and records shared by every layer.
//! - **Actions** ([`ClientEnvelope`], [`ClientAction`]): what a client can
//!   ask the server to do.
//! - **Acknowledgment errors** ([`ErrorCode`], [`AckError`]): the closed
//!   error taxonomy delivered back to the caller.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how messages are converted
//!   to/from bytes.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the lobby,
//! engine, and session layers. It doesn't know about connections or rooms;
//! it only knows what the messages look like.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientEnvelope) → Orchestrator (rooms, games)
//! ```

mod ack;
mod action;
mod codec;
mod error;
mod types;

pub use ack::{AckError, ErrorCode};
pub use action::{ClientAction, ClientEnvelope, PlayRequest, PrivateMessage};
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ChannelId, GameId, Identity, Pairing, UserId};
