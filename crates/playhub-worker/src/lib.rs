//! # playhub-worker
//!
//! Background scheduling for PlayHub: runs the session expiry sweep on
//! a cron schedule so expired records are physically removed even when
//! no login traffic replaces them.

pub mod scheduler;

pub use scheduler::SweepScheduler;
