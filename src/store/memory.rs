//! In-process store for tests and database-less local runs.

use super::{StoreResult, StudentStore};
use crate::model::{Student, StudentFields, StudentProjection};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStudentStore {
    rows: RwLock<Vec<Student>>,
    failing: AtomicBool,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the database went away.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn check(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolClosed);
        }
        Ok(())
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn create(&self, fields: StudentFields) -> StoreResult<Student> {
        self.check()?;
        let student = Student {
            id: Uuid::new_v4(),
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            class_enrolled: fields.class_enrolled,
            created_at: Utc::now(),
        };
        self.rows.write().await.push(student.clone());
        Ok(student)
    }

    async fn find_many(&self) -> StoreResult<Vec<StudentProjection>> {
        self.check()?;
        Ok(self.rows.read().await.iter().map(StudentProjection::from).collect())
    }

    async fn find_unique(&self, id: Uuid) -> StoreResult<Option<Student>> {
        self.check()?;
        Ok(self.rows.read().await.iter().find(|s| s.id == id).cloned())
    }

    async fn find_projection(&self, id: Uuid) -> StoreResult<Option<StudentProjection>> {
        self.check()?;
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .map(StudentProjection::from))
    }

    async fn update(&self, id: Uuid, fields: StudentFields) -> StoreResult<Option<Student>> {
        self.check()?;
        let mut rows = self.rows.write().await;
        let Some(row) = rows.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        row.first_name = fields.first_name;
        row.last_name = fields.last_name;
        row.email = fields.email;
        row.class_enrolled = fields.class_enrolled;
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        self.check()?;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|s| s.id != id);
        Ok(rows.len() < before)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check()
    }
}
