/// Closed set of failure kinds every layer agrees on.
///
/// Storage adapters classify their native errors into one of these before
/// returning; services pass them through untouched; the HTTP layer maps the
/// kind to a status code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Malformed input, bad credentials, wrong or expired code, invalid session.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unique-constraint violation.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// Store, crypto or entropy failure. The message is for logs only.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Tag of a [`CoreError`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    AlreadyExists,
    NotFound,
    Internal,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            CoreError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Shorthand for an [`CoreError::Internal`] built from any displayable error.
    pub fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        CoreError::Internal(format!("{context}: {err}"))
    }
}
