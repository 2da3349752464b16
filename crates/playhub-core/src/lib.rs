//! # playhub-core
//!
//! Core crate for PlayHub. Contains configuration schemas, session domain
//! events, and the unified error system.
//!
//! This crate has **no** internal dependencies on other PlayHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
