//! In-memory engine for the Stockroom asset and software-license domain.
//!
//! Owns all entity state and all locking. The stores are designed to be
//! shared behind an `Arc<Engine>`: the catalog is read-mostly, assets are
//! serialized per asset id, and license pools are serialized per pool id
//! so capacity checks can never race.

pub mod assets;
pub mod catalog;
pub mod engine;
pub mod installations;
pub mod licenses;
pub mod models;

pub use engine::Engine;
