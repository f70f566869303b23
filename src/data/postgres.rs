use crate::{
    data::{
        StudentRepository,
        student::{Student, StudentDetails},
    },
    error::{
        CommitTransactionSnafu, GetDatabaseConnectionSnafu, MakeQuerySnafu, MigrateSnafu,
        OpenDatabaseSnafu, RosterResult,
    },
};
use async_trait::async_trait;
use snafu::ResultExt;
use sqlx::{Pool, Postgres, postgres::PgPoolOptions};

#[derive(sqlx::FromRow)]
struct UpsertedStudent {
    #[sqlx(flatten)]
    student: Student,
    inserted: bool,
}

#[derive(Clone, Debug)]
pub struct PgStudentRepository {
    pool: Pool<Postgres>,
}

impl PgStudentRepository {
    pub async fn connect(options: PgPoolOptions, db_path: &str) -> RosterResult<Self> {
        let pool = options.connect(db_path).await.context(OpenDatabaseSnafu)?;

        sqlx::migrate!().run(&pool).await.context(MigrateSnafu)?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl StudentRepository for PgStudentRepository {
    async fn find_all(&self) -> RosterResult<Vec<Student>> {
        sqlx::query_as::<_, Student>("SELECT * FROM public.students ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context(MakeQuerySnafu)
    }

    async fn find_by_id(&self, id: i64) -> RosterResult<Option<Student>> {
        sqlx::query_as::<_, Student>("SELECT * FROM public.students WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context(MakeQuerySnafu)
    }

    async fn exists_by_id(&self, id: i64) -> RosterResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM public.students WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .context(MakeQuerySnafu)
    }

    async fn save(&self, id: Option<i64>, details: StudentDetails) -> RosterResult<Student> {
        let StudentDetails {
            name,
            last_name,
            age,
            course,
        } = details;

        let Some(id) = id else {
            return sqlx::query_as::<_, Student>(
                "INSERT INTO public.students (name, last_name, age, course) VALUES ($1, $2, $3, $4) RETURNING *",
            )
            .bind(name)
            .bind(last_name)
            .bind(age)
            .bind(course)
            .fetch_one(&self.pool)
            .await
            .context(MakeQuerySnafu);
        };

        let mut transaction = self.pool.begin().await.context(GetDatabaseConnectionSnafu)?;

        //`xmax = 0` only holds for a freshly inserted tuple, an updated one carries the updating xid
        let UpsertedStudent { student, inserted } = sqlx::query_as::<_, UpsertedStudent>(
            "INSERT INTO public.students (id, name, last_name, age, course) VALUES ($1, $2, $3, $4, $5) ON CONFLICT (id) DO UPDATE SET name = $2, last_name = $3, age = $4, course = $5 RETURNING *, (xmax = 0) AS inserted",
        )
        .bind(id)
        .bind(name)
        .bind(last_name)
        .bind(age)
        .bind(course)
        .fetch_one(&mut *transaction)
        .await
        .context(MakeQuerySnafu)?;

        //an inserted explicit id skipped the sequence. only ever move it forward, so ids are never reused
        if inserted {
            sqlx::query(
                "SELECT setval('public.students_id_seq', $1) FROM public.students_id_seq WHERE last_value < $1 OR (last_value = $1 AND NOT is_called)",
            )
            .bind(id)
            .execute(&mut *transaction)
            .await
            .context(MakeQuerySnafu)?;
        }

        transaction.commit().await.context(CommitTransactionSnafu)?;
        Ok(student)
    }

    async fn delete_by_id(&self, id: i64) -> RosterResult<()> {
        sqlx::query("DELETE FROM public.students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context(MakeQuerySnafu)?;
        Ok(())
    }

    async fn find_by_course(&self, course: &str) -> RosterResult<Vec<Student>> {
        sqlx::query_as::<_, Student>("SELECT * FROM public.students WHERE course = $1 ORDER BY id")
            .bind(course)
            .fetch_all(&self.pool)
            .await
            .context(MakeQuerySnafu)
    }

    async fn find_by_age_range(&self, min: i32, max: i32) -> RosterResult<Vec<Student>> {
        sqlx::query_as::<_, Student>(
            "SELECT * FROM public.students WHERE age BETWEEN $1 AND $2 ORDER BY id",
        )
        .bind(min)
        .bind(max)
        .fetch_all(&self.pool)
        .await
        .context(MakeQuerySnafu)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
