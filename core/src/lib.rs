//! # BakeHouse Core
//!
//! Step-up authentication for the BakeHouse back office: one-time passcode
//! generation, salted storage, time-bound verification, asynchronous delivery,
//! and the primary password hashing discipline.
//!
//! External collaborators (account directory, OTP store, account store, mail
//! transport) are traits; concrete implementations live in `bh_infra`, with
//! in-memory versions here for development and tests.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
