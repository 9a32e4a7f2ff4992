//! Data access for students. Handlers reach the store only through [`StudentStore`],
//! which is injected via `AppState`.

mod bootstrap;
mod memory;
mod postgres;

pub use bootstrap::{apply_migrations, ensure_database_exists};
pub use memory::MemoryStudentStore;
pub use postgres::PgStudentStore;

use crate::model::{Student, StudentFields, StudentProjection};
use async_trait::async_trait;
use uuid::Uuid;

pub type StoreResult<T> = Result<T, sqlx::Error>;

#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Insert a row; the store generates the id.
    async fn create(&self, fields: StudentFields) -> StoreResult<Student>;

    /// All students, projected, oldest first.
    async fn find_many(&self) -> StoreResult<Vec<StudentProjection>>;

    async fn find_unique(&self, id: Uuid) -> StoreResult<Option<Student>>;

    async fn find_projection(&self, id: Uuid) -> StoreResult<Option<StudentProjection>>;

    /// Overwrite all writable fields. `None` if the row no longer exists.
    async fn update(&self, id: Uuid, fields: StudentFields) -> StoreResult<Option<Student>>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;

    /// Readiness probe.
    async fn ping(&self) -> StoreResult<()>;
}
