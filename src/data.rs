use crate::{
    data::student::{Student, StudentDetails},
    error::RosterResult,
};
use async_trait::async_trait;

pub mod memory;
pub mod postgres;
pub mod student;

/// Persistence access for students. Implemented once per backing store.
#[async_trait]
pub trait StudentRepository: Send + Sync + std::fmt::Debug {
    async fn find_all(&self) -> RosterResult<Vec<Student>>;
    async fn find_by_id(&self, id: i64) -> RosterResult<Option<Student>>;
    async fn exists_by_id(&self, id: i64) -> RosterResult<bool>;
    /// With no id this inserts and the store picks one. With an id, that row is overwritten,
    /// or created with that id if it has gone missing.
    async fn save(&self, id: Option<i64>, details: StudentDetails) -> RosterResult<Student>;
    async fn delete_by_id(&self, id: i64) -> RosterResult<()>;
    async fn find_by_course(&self, course: &str) -> RosterResult<Vec<Student>>;
    /// Inclusive on both ends, and empty whenever `min > max`.
    async fn find_by_age_range(&self, min: i32, max: i32) -> RosterResult<Vec<Student>>;

    async fn close(&self) {}
}
