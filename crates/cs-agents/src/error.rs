/// Alias for `Result<T, AgentError>`.
pub type AgentResult<T> = Result<T, AgentError>;

/// Errors raised while constructing agents.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The policy name is not one of the built-in targeting policies.
    #[error("unknown targeting policy '{0}' (expected one of: none, closest, weakest, most_dangerous)")]
    UnknownPolicy(String),

    /// A recorded script could not be read or written.
    #[error("script error: {0}")]
    Script(#[from] serde_json::Error),
}
