//! Core types for csim: units, sides, actions, arena geometry, and the unit registry.
//!
//! This crate is the data model the simulation engine operates on. It does
//! not know about frames, views, or agents; see `cs-simulation` for those.

/// Orders that agents give to their units.
pub mod action;
/// Unit state, identifiers, and sides.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Vectors, rectangles, and the arena.
pub mod geometry;
/// The registry of living units.
pub mod registry;
/// Unit type templates and catalogs.
pub mod unit_type;

/// Re-export the action type.
pub use action::Action;
/// Re-export core entity types.
pub use entity::{Entity, EntityId, Motion, Side};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export geometry types.
pub use geometry::{Arena, Rect, Vec2};
/// Re-export the registry.
pub use registry::Registry;
/// Re-export unit type templates.
pub use unit_type::{UnitCatalog, UnitType};
