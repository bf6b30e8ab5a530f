//! Peer handles
//!
//! A peer has two facets: an identity (`PeerId`) that stays valid for logging
//! and exclusion after the connection is gone, and a shared writer that
//! broadcasts deliver into.

pub mod handle;
pub mod identity;

pub use handle::{Peer, PeerWriter};
pub use identity::PeerId;
