use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

/// Record a `required` error for `field` when `value` is empty after trimming.
pub fn require_non_blank(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    message: &'static str,
) {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some(Cow::Borrowed(message));
        errors.add(field, error);
    }
}

/// Flatten field errors into one user-facing sentence.
///
/// Only the configured messages are used, never the rejected values.
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
