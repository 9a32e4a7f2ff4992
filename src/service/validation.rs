//! Presence validation for create payloads.

use crate::error::AppError;
use crate::model::{NewStudent, StudentFields};

pub const ALL_FIELDS_REQUIRED: &str = "All fields are required";

pub struct RequestValidator;

impl RequestValidator {
    /// All four fields must be present and non-empty. No other checks are made.
    pub fn validate_new(body: NewStudent) -> Result<StudentFields, AppError> {
        let NewStudent {
            first_name,
            last_name,
            email,
            class_enrolled,
        } = body;
        match (
            required(first_name),
            required(last_name),
            required(email),
            required(class_enrolled),
        ) {
            (Some(first_name), Some(last_name), Some(email), Some(class_enrolled)) => Ok(StudentFields {
                first_name,
                last_name,
                email,
                class_enrolled,
            }),
            _ => Err(AppError::Validation(ALL_FIELDS_REQUIRED.into())),
        }
    }
}

fn required(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}
