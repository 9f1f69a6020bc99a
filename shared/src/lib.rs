//! FitPulse Shared Library
//!
//! This crate contains the domain models, API types, validation and
//! AI-response parsing shared by the backend and the WASM module.

pub mod ai_payload;
pub mod errors;
pub mod models;
pub mod nutrition;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::*;
pub use nutrition::{aggregate_macros, macro_progress, MacroProgress, MacroTotals};
