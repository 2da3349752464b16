//! # playhub-session
//!
//! The session store: expiring, username-indexed session records with
//! at-most-one-active-session-per-username semantics.
//!
//! [`SessionStore`] implements the lifecycle operations (create, lookup,
//! refresh, delete, sweep) on top of a [`SessionBackend`]. Two backends
//! are provided: PostgreSQL for production and an in-memory one for
//! single-node or test deployments.

pub mod backend;
pub mod store;
pub mod sweeper;

pub use backend::{MemorySessionBackend, PostgresSessionBackend, SessionBackend};
pub use store::SessionStore;
pub use sweeper::SessionSweeper;
