//! Storage operations per resource. Handlers stay thin and call into these.

pub mod facilities;
pub mod routes;
pub mod stations;

use crate::{
    errors::{AppError, FieldErrors},
    serializers::REQUIRED,
};

/// Unwraps a field that a full write must carry.
pub(crate) fn required<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::Validation(FieldErrors::single(field, REQUIRED)))
}
