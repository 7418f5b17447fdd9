//! Domain services used by the HTTP and socket routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the polling loop and room bookkeeping so route
//! handlers stay focused on request parsing and response mapping.

pub mod poll;
pub mod room;
