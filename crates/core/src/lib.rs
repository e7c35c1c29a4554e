#![forbid(unsafe_code)]

//! Domain model for the TechElevate portal.
//!
//! Everything that is persisted lives in [`model::Document`]: the user
//! accounts with their journals, the shared learning materials, and the
//! question/answer queue. This crate holds only validated types and pure
//! operations; persistence and session handling live in the `storage` and
//! `services` crates.

pub mod model;
pub mod time;

pub use time::Clock;
