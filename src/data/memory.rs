use crate::{
    data::{
        StudentRepository,
        student::{Student, StudentDetails},
    },
    error::RosterResult,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Keeps students in a map instead of a database, for tests and for running without Postgres.
#[derive(Debug, Default)]
pub struct MemoryStudentRepository {
    inner: RwLock<MemoryTable>,
}

#[derive(Debug, Default)]
struct MemoryTable {
    rows: BTreeMap<i64, Student>,
    last_id: i64,
}

impl MemoryStudentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn filter(&self, predicate: impl Fn(&Student) -> bool) -> Vec<Student> {
        self.inner
            .read()
            .await
            .rows
            .values()
            .filter(|student| predicate(student))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl StudentRepository for MemoryStudentRepository {
    async fn find_all(&self) -> RosterResult<Vec<Student>> {
        Ok(self.filter(|_| true).await)
    }

    async fn find_by_id(&self, id: i64) -> RosterResult<Option<Student>> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> RosterResult<bool> {
        Ok(self.inner.read().await.rows.contains_key(&id))
    }

    async fn save(&self, id: Option<i64>, details: StudentDetails) -> RosterResult<Student> {
        let mut table = self.inner.write().await;

        let id = match id {
            Some(id) => {
                table.last_id = table.last_id.max(id);
                id
            }
            None => {
                table.last_id += 1;
                table.last_id
            }
        };

        let student = details.with_id(id);
        table.rows.insert(id, student.clone());
        Ok(student)
    }

    async fn delete_by_id(&self, id: i64) -> RosterResult<()> {
        self.inner.write().await.rows.remove(&id);
        Ok(())
    }

    async fn find_by_course(&self, course: &str) -> RosterResult<Vec<Student>> {
        Ok(self.filter(|student| student.course == course).await)
    }

    async fn find_by_age_range(&self, min: i32, max: i32) -> RosterResult<Vec<Student>> {
        Ok(self.filter(|student| (min..=max).contains(&student.age)).await)
    }
}
