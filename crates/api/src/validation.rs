//! JSON body extractor that runs `validator` rules before the handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};
use vitalis_core::error::{CoreError, FieldError};

use crate::error::AppError;

/// Like [`Json`], but rejects bodies that fail `T::validate()` with field-level
/// detail.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Parse to a generic value first so syntax and content-type problems
        // are reported by axum, then map the value onto `T` keeping the path.
        let Json(raw) = Json::<serde_json::Value>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        let value: T = serde_path_to_error::deserialize(raw).map_err(shape_error)?;

        value
            .validate()
            .map_err(|errors| AppError::Core(CoreError::InvalidFields(field_errors(&errors))))?;

        Ok(ValidatedJson(value))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::BadRequest("Missing 'Content-Type: application/json' header".into());
    }
    AppError::BadRequest("Invalid request body".into())
}

/// Turn a deserialization failure into field-level detail where a field can
/// be named. Failures at the document root (e.g. an array body) stay generic.
fn shape_error(err: serde_path_to_error::Error<serde_json::Error>) -> AppError {
    let path = err.path().to_string();
    let at_root = path == ".";
    let message = err.into_inner().to_string();

    if let Some(missing) = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
    {
        let field = if at_root {
            missing.to_string()
        } else {
            format!("{path}.{missing}")
        };
        return AppError::Core(CoreError::InvalidFields(vec![FieldError::new(
            field,
            "is required",
        )]));
    }

    if at_root {
        return AppError::BadRequest("Invalid request body".into());
    }

    AppError::Core(CoreError::InvalidFields(vec![FieldError::new(path, message)]))
}

/// Flatten `validator` output into one entry per failed rule, ordered by field.
fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"));
                FieldError::new(field.to_string(), message)
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}
