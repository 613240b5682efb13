//! Per-user session state and storage.

pub mod state;
pub mod store;

pub use state::{PROGRAM_FORM_STEPS, SessionState};
pub use store::{InMemorySessionStore, SessionStore};
