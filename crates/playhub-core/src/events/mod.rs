//! Domain events published by the session store.

pub mod session;

pub use session::SessionEvent;
