//! Student operations. Each returns as soon as an outcome is known; handlers turn
//! the single result into a single response.

use super::validation::RequestValidator;
use crate::error::AppError;
use crate::model::{NewStudent, Student, StudentPatch, StudentProjection};
use crate::store::StudentStore;
use std::sync::Arc;
use uuid::Uuid;

pub const STUDENT_ID_NOT_FOUND: &str = "Student with provided id not found";
pub const STUDENT_NOT_FOUND: &str = "Student not found";

#[derive(Clone)]
pub struct StudentService {
    store: Arc<dyn StudentStore>,
}

impl StudentService {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn StudentStore> {
        &self.store
    }

    /// Validate presence of all fields, then insert. Nothing is written on validation failure.
    pub async fn create(&self, body: NewStudent) -> Result<Student, AppError> {
        let fields = RequestValidator::validate_new(body)?;
        let student = self.store.create(fields).await?;
        tracing::info!(id = %student.id, "student created");
        Ok(student)
    }

    pub async fn list(&self) -> Result<Vec<StudentProjection>, AppError> {
        Ok(self.store.find_many().await?)
    }

    pub async fn read(&self, id: &str) -> Result<StudentProjection, AppError> {
        let id = parse_id(id, STUDENT_ID_NOT_FOUND)?;
        self.store
            .find_projection(id)
            .await?
            .ok_or_else(|| AppError::NotFound(STUDENT_ID_NOT_FOUND.into()))
    }

    /// Read-then-write merge. Concurrent writers on the same id are not coordinated.
    pub async fn update(&self, id: &str, patch: StudentPatch) -> Result<Student, AppError> {
        let id = parse_id(id, STUDENT_NOT_FOUND)?;
        let existing = self
            .store
            .find_unique(id)
            .await?
            .ok_or_else(|| AppError::NotFound(STUDENT_NOT_FOUND.into()))?;
        let fields = patch.apply_to(&existing);
        let updated = self
            .store
            .update(id, fields)
            .await?
            .ok_or_else(|| AppError::NotFound(STUDENT_NOT_FOUND.into()))?;
        tracing::info!(%id, "student updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let id = parse_id(id, STUDENT_NOT_FOUND)?;
        if self.store.find_unique(id).await?.is_none() {
            return Err(AppError::NotFound(STUDENT_NOT_FOUND.into()));
        }
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound(STUDENT_NOT_FOUND.into()));
        }
        tracing::info!(%id, "student deleted");
        Ok(())
    }
}

/// Ids are UUIDs; anything else cannot name a stored student.
fn parse_id(id: &str, not_found: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound(not_found.into()))
}
