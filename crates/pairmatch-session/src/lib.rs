//! Connection sessions for pairmatch.
//!
//! Every live connection gets a [`Session`] the moment it is accepted. It
//! starts anonymous; `login` attaches the [`Identity`] the client hands
//! over, and every lobby or game action checks for one through
//! [`SessionManager::identity`].
//!
//! ```text
//! open() ──→ [Anonymous] ──login()──→ [LoggedIn] ──logout()──→ [Anonymous]
//!                 │                        │
//!                 └──────── close() ───────┘
//! ```
//!
//! [`Identity`]: pairmatch_protocol::Identity

mod error;
mod manager;
mod session;

pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{Session, SessionState};
