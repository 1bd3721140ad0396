use cs_core::CoreError;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors that abort world setup. Per-action rejections are never errors.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Invalid world dimensions, split threshold, or other settings.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The scenario could not interpret its parameters or place its units.
    #[error("scenario '{scenario}': {reason}")]
    Scenario {
        /// Name of the scenario.
        scenario: String,
        /// What went wrong.
        reason: String,
    },

    /// An error from the unit data model.
    #[error(transparent)]
    Core(#[from] CoreError),
}
