//! Shared types for the truckstop scheduling registry
//!
//! Domain models, the unified error type, and response structures used by the
//! server crate and its tests.

pub mod error;
pub mod models;

// Re-exports
pub use error::{AppError, AppResult};
pub use serde::{Deserialize, Serialize};
