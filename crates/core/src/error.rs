use serde::Serialize;

/// A single rejected request field and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Bad credentials, an unusable token, or an inactive account. The message
    /// is for logs only; callers see a single generic rejection.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Validation failed for {} field(s)", .0.len())]
    InvalidFields(Vec<FieldError>),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Build an [`CoreError::Internal`] that records which operation failed.
    pub fn internal(operation: &str, err: impl std::fmt::Display) -> Self {
        CoreError::Internal(format!("{operation}: {err}"))
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn internal_records_operation_name() {
        let err = CoreError::internal("session_store.create", "connection reset");
        assert_matches!(&err, CoreError::Internal(msg) if msg == "session_store.create: connection reset");
    }

    #[test]
    fn invalid_fields_display_counts_fields() {
        let err = CoreError::InvalidFields(vec![
            FieldError::new("email", "must be a valid email"),
            FieldError::new("password", "is required"),
        ]);
        assert_eq!(err.to_string(), "Validation failed for 2 field(s)");
    }
}
