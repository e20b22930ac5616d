/// Convenience result type used across progressa.
pub type ProgressaResult<T> = Result<T, ProgressaError>;

/// Top-level error taxonomy used by renderer APIs.
#[derive(thiserror::Error, Debug)]
pub enum ProgressaError {
    /// Invalid user-provided settings or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors raised by a render backend while executing a pass.
    #[error("backend error: {0}")]
    Backend(String),

    /// A backend reported a render target that cannot be drawn into.
    #[error("incomplete render target: {0}")]
    IncompleteTarget(String),

    /// Errors when serializing or deserializing settings.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProgressaError {
    /// Build a [`ProgressaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ProgressaError::Backend`] value.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Build a [`ProgressaError::IncompleteTarget`] value.
    pub fn incomplete_target(msg: impl Into<String>) -> Self {
        Self::IncompleteTarget(msg.into())
    }

    /// Build a [`ProgressaError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
