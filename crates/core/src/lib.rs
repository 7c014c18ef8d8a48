//! Domain rules for the Stockroom asset and software-license engine.
//!
//! Pure functions, constants, and shared types with zero internal
//! dependencies, so the same rules can be used by the store, the API
//! layer, and any future CLI tooling.

pub mod error;
pub mod hierarchy;
pub mod labels;
pub mod licensing;
pub mod status;
pub mod tagging;
pub mod types;
