#![forbid(unsafe_code)]

//! Application services for the TechElevate portal.
//!
//! [`Portal`] owns the live document, the store, the clock, and the session
//! context, and exposes one method per repository operation. Each mutator
//! persists the whole document on success; rendering consumes the read-only
//! projections.

pub mod error;
pub mod portal;
pub mod session;

pub use elevate_core::Clock;

pub use error::PortalError;
pub use portal::Portal;
pub use session::SessionContext;
