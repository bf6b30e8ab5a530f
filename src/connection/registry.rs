//! Connection registry
//!
//! Tracks the peers whose handlers have completed registration and not yet
//! completed deregistration.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tokio::sync::Mutex;

use crate::error::RegistryError;
use crate::peer::{Peer, PeerId};

/// Registry of active peers, shared by every handler and the accept loop.
///
/// The lock is only held for the set mutation or the snapshot copy, never
/// across network I/O.
#[derive(Default)]
pub struct ConnectionRegistry {
    peers: Mutex<HashMap<PeerId, Peer>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a peer. Registering the same identity twice is an invariant
    /// violation and leaves the registry untouched.
    pub async fn add(&self, peer: Peer) -> Result<(), RegistryError> {
        let mut peers = self.peers.lock().await;
        match peers.entry(peer.id()) {
            Entry::Occupied(_) => Err(RegistryError::DuplicatePeer(peer.id())),
            Entry::Vacant(slot) => {
                slot.insert(peer);
                Ok(())
            }
        }
    }

    /// Removes a peer if present. Removing an absent peer is a no-op.
    pub async fn remove(&self, id: PeerId) -> Option<Peer> {
        self.peers.lock().await.remove(&id)
    }

    /// Returns a copy of the current peers, ordered by identity.
    pub async fn snapshot(&self) -> Vec<Peer> {
        let peers = self.peers.lock().await;
        let mut snapshot: Vec<Peer> = peers.values().cloned().collect();
        drop(peers);

        snapshot.sort_by_key(Peer::id);
        snapshot
    }

    pub async fn contains(&self, id: PeerId) -> bool {
        self.peers.lock().await.contains_key(&id)
    }

    pub async fn len(&self) -> usize {
        self.peers.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.peers.lock().await.is_empty()
    }
}
