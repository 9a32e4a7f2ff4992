//! HTTP handlers for student CRUD.

pub mod student;
