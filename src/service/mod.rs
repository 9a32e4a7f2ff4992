//! StudentService: the five student operations on top of an injected store.

mod crud;
mod validation;
pub use crud::{StudentService, STUDENT_ID_NOT_FOUND, STUDENT_NOT_FOUND};
pub use validation::{RequestValidator, ALL_FIELDS_REQUIRED};
