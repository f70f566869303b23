use crate::{
    data::{
        StudentRepository,
        student::{Student, StudentDetails},
    },
    error::{MissingStudentSnafu, RosterResult},
};
use snafu::OptionExt;
use std::sync::Arc;

/// Existence checks and validation around the repository. Holds no state of its own.
#[derive(Clone, Debug)]
pub struct StudentService {
    repository: Arc<dyn StudentRepository>,
}

impl StudentService {
    pub fn new(repository: Arc<dyn StudentRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_all(&self) -> RosterResult<Vec<Student>> {
        self.repository.find_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> RosterResult<Student> {
        self.repository
            .find_by_id(id)
            .await?
            .context(MissingStudentSnafu { id })
    }

    pub async fn create(&self, details: StudentDetails) -> RosterResult<Student> {
        details.validate()?;
        let student = self.repository.save(None, details).await?;
        info!(id = student.id, "Created student");
        Ok(student)
    }

    // check-then-write, nothing stops a delete landing in between and the upsert bringing the row back
    pub async fn update(&self, id: i64, details: StudentDetails) -> RosterResult<Student> {
        snafu::ensure!(
            self.repository.exists_by_id(id).await?,
            MissingStudentSnafu { id }
        );
        details.validate()?;

        let student = self.repository.save(Some(id), details).await?;
        info!(id, "Updated student");
        Ok(student)
    }

    pub async fn delete(&self, id: i64) -> RosterResult<()> {
        snafu::ensure!(
            self.repository.exists_by_id(id).await?,
            MissingStudentSnafu { id }
        );

        self.repository.delete_by_id(id).await?;
        info!(id, "Deleted student");
        Ok(())
    }

    pub async fn get_by_course(&self, course: &str) -> RosterResult<Vec<Student>> {
        self.repository.find_by_course(course).await
    }

    pub async fn get_by_age_range(&self, min: i32, max: i32) -> RosterResult<Vec<Student>> {
        self.repository.find_by_age_range(min, max).await
    }

    pub async fn shutdown(&self) {
        self.repository.close().await;
    }
}
