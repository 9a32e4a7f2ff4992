//! Student records: a REST backend for student CRUD over PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{Config, StoreBackend};
pub use error::AppError;
pub use model::{NewStudent, Student, StudentFields, StudentPatch, StudentProjection};
pub use routes::{app, common_routes, student_routes};
pub use service::StudentService;
pub use state::AppState;
pub use store::{apply_migrations, ensure_database_exists, MemoryStudentStore, PgStudentStore, StudentStore};
