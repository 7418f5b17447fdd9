//! Event — the socket message type for the room relay.
//!
//! ARCHITECTURE
//! ============
//! Board and viewer pages exchange JSON text frames of the form
//! `{ "event": "...", "data": ..., "room": "..." }`. The server only
//! understands `joinSession`; every other event is signaling traffic that
//! is relayed to room peers without inspecting `data`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event name that adds the sending connection to a room.
pub const JOIN_SESSION: &str = "joinSession";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event: String,
    #[serde(default)]
    pub data: Value,
    /// Target room for relayed events. Absent means every joined room.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

impl Event {
    #[must_use]
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self { event: event.into(), data, room: None }
    }

    #[must_use]
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    #[cfg(test)]
    #[must_use]
    pub fn join_session(room: impl Into<String>) -> Self {
        Self::new(JOIN_SESSION, Value::String(room.into()))
    }

    #[must_use]
    pub fn is_join(&self) -> bool {
        self.event == JOIN_SESSION
    }

    /// Room identifier carried by a `joinSession` event.
    #[must_use]
    pub fn join_room(&self) -> Option<&str> {
        if self.is_join() { self.data.as_str() } else { None }
    }
}
