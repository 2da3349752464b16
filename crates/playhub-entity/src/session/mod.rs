//! Player session domain entities.

pub mod kind;
pub mod model;

pub use kind::PlayerKind;
pub use model::{CreateSession, Session};
