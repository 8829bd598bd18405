//! # Intake Common
//!
//! Shared types, errors, and constants used by the answer intake service.
//!
//! ## Modules
//! - `types` - Wire and storage data structures (VerificationResult, UserIdentity, etc.)
//! - `error` - Collaborator error type
//! - `constants` - Shared defaults, Redis key prefixes, header names

pub mod constants;
pub mod error;
pub mod types;

pub use error::IntakeError;
pub use types::*;
