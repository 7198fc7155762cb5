//! API handlers for the JSON adapter.

pub mod email;

pub use email::*;

use crate::MailingList;

/// Application state shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Subscriber registry.
    pub registry: MailingList,
}

impl AppState {
    /// Create a new application state.
    pub fn new(registry: MailingList) -> Self {
        Self { registry }
    }
}
