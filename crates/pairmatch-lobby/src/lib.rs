//! Open game offer registry for pairmatch.
//!
//! The lobby is the list of games waiting for a second player. It is a plain
//! in-memory registry: the orchestrator owns the only instance and calls it
//! from its single event loop, so there is no locking here.
//!
//! # Key types
//!
//! - [`Lobby`]: add, look up, remove, and list offers
//! - [`Offer`]: one advertised game

mod lobby;
mod offer;

pub use lobby::Lobby;
pub use offer::Offer;
