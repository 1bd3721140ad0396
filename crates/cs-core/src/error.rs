use crate::entity::EntityId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the unit data model.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested entity does not exist in the registry.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// A unit type name is not present in the catalog.
    #[error("unknown unit type: \"{0}\"")]
    UnknownUnitType(String),

    /// A unit type definition has out-of-range values.
    #[error("invalid unit type \"{name}\": {reason}")]
    InvalidUnitType {
        /// The offending unit type.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A move order cannot be carried out at the unit's speed.
    #[error("{id} cannot reach a destination {distance:.1} away at speed {speed}")]
    UnreachableDestination {
        /// The unit that was ordered to move.
        id: EntityId,
        /// Distance to the destination.
        distance: f64,
        /// The unit's speed.
        speed: f64,
    },

    /// A unit catalog could not be parsed.
    #[error("malformed unit catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}
