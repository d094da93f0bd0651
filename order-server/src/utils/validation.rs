//! Input validation helpers
//!
//! Bridges `validator` derive output into [`AppError`].

use validator::{Validate, ValidationErrors};

use crate::utils::AppError;

/// Run `validator` rules on a payload
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(validation_error)
}

/// Flatten field errors into one readable message, field names sorted
fn validation_error(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let message = fields
        .iter()
        .map(|(field, errs)| {
            let reason = errs
                .first()
                .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| {
                    errs.first()
                        .map(|e| e.code.to_string())
                        .unwrap_or_else(|| "invalid".to_string())
                });
            format!("{field}: {reason}")
        })
        .collect::<Vec<_>>()
        .join("; ");

    AppError::validation(message)
}
