//! Per-connection conversation state.

pub mod store;

pub use store::{Session, SessionStore};
