//! Session layer for gridduel.
//!
//! Each [`Series`](gridduel_series::Series) runs as an isolated Tokio task
//! (a series actor) that owns the series, its current match and its move
//! deadlines. Moves and deadline expiries for one series are handled one
//! at a time by that task, so they never interleave.
//!
//! The [`SessionDirectory`] is the shared index that resolves series by
//! id, match id, player id and pairing id.
//!
//! # Key types
//!
//! - [`SeriesHandle`]: send commands to a running series actor
//! - [`SessionDirectory`]: the identity-indexed lookup
//! - [`PlayerRegistry`]: the collaborator hook that vouches for player ids
//! - [`SessionConfig`]: series, timer and actor settings

#![allow(async_fn_in_trait)]

mod actor;
mod config;
mod directory;
mod error;
mod registry;

pub use actor::{SeriesHandle, spawn_series};
pub use config::SessionConfig;
pub use directory::{SessionDirectory, SharedDirectory};
pub use error::SessionError;
pub use registry::{AnyPlayer, PlayerRegistry};
