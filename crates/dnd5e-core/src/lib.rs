//! Core types for the dnd5e resource engine: flat records, addresses,
//! persisted state, and errors.
//!
//! This crate is the contract between the mechanics engine and whatever
//! hosts it. A host persists one flat [`Record`] per tracked resource in a
//! [`State`] and hands those records to the engine on every lifecycle call.

/// Resource addresses (`kind.name`) and identifiers.
pub mod address;
/// Error types used throughout the workspace.
pub mod error;
/// Flat key/value records for a single resource.
pub mod record;
/// Persisted state of all tracked resources.
pub mod state;
/// Loosely-typed values stored in records.
pub mod value;

/// Re-export address types.
pub use address::{ResourceAddress, ResourceId};
/// Re-export error types.
pub use error::{DndError, DndResult};
/// Re-export record type.
pub use record::Record;
/// Re-export state types.
pub use state::{ResourceState, State};
/// Re-export value type.
pub use value::Value;
