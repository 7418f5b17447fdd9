//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the generation API client, the polling policy, and the room
//! registry used by the socket relay. Nothing here is persisted.

use std::sync::Arc;

use crate::services::poll::PollPolicy;
use crate::services::room::Rooms;
use crate::upstream::GenerationApi;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn GenerationApi>,
    pub poll: PollPolicy,
    pub rooms: Rooms,
}

impl AppState {
    #[must_use]
    pub fn new(api: Arc<dyn GenerationApi>, poll: PollPolicy) -> Self {
        Self { api, poll, rooms: Rooms::new() }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
