//! PostgreSQL-backed store using parameterized runtime queries.

use super::{StoreResult, StudentStore};
use crate::model::{Student, StudentFields, StudentProjection};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const FULL_COLUMNS: &str = "id, first_name, last_name, email, class_enrolled, created_at";
const PROJECTED_COLUMNS: &str = "first_name, last_name, email, class_enrolled";

#[derive(Clone)]
pub struct PgStudentStore {
    pool: PgPool,
}

impl PgStudentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn create(&self, fields: StudentFields) -> StoreResult<Student> {
        let sql = format!(
            "INSERT INTO students (first_name, last_name, email, class_enrolled) VALUES ($1, $2, $3, $4) RETURNING {}",
            FULL_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        sqlx::query_as::<_, Student>(&sql)
            .bind(fields.first_name)
            .bind(fields.last_name)
            .bind(fields.email)
            .bind(fields.class_enrolled)
            .fetch_one(&self.pool)
            .await
    }

    async fn find_many(&self) -> StoreResult<Vec<StudentProjection>> {
        let sql = format!(
            "SELECT {} FROM students ORDER BY created_at, id",
            PROJECTED_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        sqlx::query_as::<_, StudentProjection>(&sql)
            .fetch_all(&self.pool)
            .await
    }

    async fn find_unique(&self, id: Uuid) -> StoreResult<Option<Student>> {
        let sql = format!("SELECT {} FROM students WHERE id = $1", FULL_COLUMNS);
        tracing::debug!(sql = %sql, %id, "query");
        sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_projection(&self, id: Uuid) -> StoreResult<Option<StudentProjection>> {
        let sql = format!("SELECT {} FROM students WHERE id = $1", PROJECTED_COLUMNS);
        tracing::debug!(sql = %sql, %id, "query");
        sqlx::query_as::<_, StudentProjection>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn update(&self, id: Uuid, fields: StudentFields) -> StoreResult<Option<Student>> {
        let sql = format!(
            "UPDATE students SET first_name = $2, last_name = $3, email = $4, class_enrolled = $5 WHERE id = $1 RETURNING {}",
            FULL_COLUMNS
        );
        tracing::debug!(sql = %sql, %id, "query");
        sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .bind(fields.first_name)
            .bind(fields.last_name)
            .bind(fields.email)
            .bind(fields.class_enrolled)
            .fetch_optional(&self.pool)
            .await
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let sql = "DELETE FROM students WHERE id = $1";
        tracing::debug!(sql = %sql, %id, "query");
        let result = sqlx::query(sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
