//! Room service — named broadcast groups for the socket relay.
//!
//! DESIGN
//! ======
//! A room is nothing more than a name and the set of connections that
//! joined it. Names come from clients and are never validated or looked up
//! against prior state. A connection may sit in several rooms at once.
//! A room entry disappears with its last member; there is no other expiry.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::event::Event;

type Members = HashMap<Uuid, mpsc::Sender<Event>>;

#[derive(Clone, Default)]
pub struct Rooms {
    inner: Arc<RwLock<HashMap<String, Members>>>,
}

impl Rooms {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to a room. Joining twice is a no-op apart from
    /// refreshing the sender.
    pub async fn join(&self, room: &str, client_id: Uuid, tx: mpsc::Sender<Event>) {
        let mut rooms = self.inner.write().await;
        let members = rooms.entry(room.to_string()).or_default();
        members.insert(client_id, tx);
        info!(%client_id, room, members = members.len(), "room: joined");
    }

    /// Remove a connection from every room it joined.
    pub async fn leave_all(&self, client_id: Uuid) {
        let mut rooms = self.inner.write().await;
        rooms.retain(|room, members| {
            if members.remove(&client_id).is_some() {
                info!(%client_id, room = room.as_str(), "room: left");
            }
            !members.is_empty()
        });
    }

    /// Deliver an event to every member of `room` except `exclude`.
    /// Returns how many members received it.
    pub async fn broadcast(&self, room: &str, event: &Event, exclude: Option<Uuid>) -> usize {
        let rooms = self.inner.read().await;
        let Some(members) = rooms.get(room) else {
            return 0;
        };

        let mut delivered = 0;
        for (client_id, tx) in members {
            if Some(*client_id) == exclude {
                continue;
            }
            match tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => warn!(%client_id, room, error = %e, "room: dropped event for member"),
            }
        }
        delivered
    }

    /// Rooms the connection currently belongs to, sorted by name.
    pub async fn rooms_of(&self, client_id: Uuid) -> Vec<String> {
        let rooms = self.inner.read().await;
        let mut names: Vec<String> = rooms
            .iter()
            .filter(|(_, members)| members.contains_key(&client_id))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    #[cfg(test)]
    pub async fn member_count(&self, room: &str) -> usize {
        self.inner.read().await.get(room).map_or(0, HashMap::len)
    }
}

#[cfg(test)]
#[path = "room_test.rs"]
mod tests;
