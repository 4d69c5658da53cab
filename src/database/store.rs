use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Student, StudentPayload};

/// The store handle every handler receives. One call per operation; any
/// mutual exclusion between concurrent writers is left to the backend.
///
/// All lookups skip soft-deleted rows, so a deleted student behaves exactly
/// like one that never existed.
#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Student>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Student>, DatabaseError>;

    /// First match by ascending id. National ids are not unique.
    async fn find_by_national_id(
        &self,
        national_id: &str,
    ) -> Result<Option<Student>, DatabaseError>;

    async fn insert(&self, payload: StudentPayload) -> Result<Student, DatabaseError>;

    /// Overwrite the three domain fields. `None` when no live row has `id`.
    async fn update(
        &self,
        id: i64,
        payload: StudentPayload,
    ) -> Result<Option<Student>, DatabaseError>;

    /// Set `deleted_at`. Returns `false` when no live row has `id`.
    async fn soft_delete(&self, id: i64) -> Result<bool, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}

const STUDENT_COLUMNS: &str =
    "id, name, national_id, registration_id, created_at, updated_at, deleted_at";

const LIVE: &str = "deleted_at IS NULL";

/// Postgres-backed store over the `students` table
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
    async fn list(&self) -> Result<Vec<Student>, DatabaseError> {
        let sql = format!("SELECT {} FROM students WHERE {} ORDER BY id", STUDENT_COLUMNS, LIVE);
        let students = sqlx::query_as::<_, Student>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(students)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Student>, DatabaseError> {
        let sql = format!("SELECT {} FROM students WHERE id = $1 AND {}", STUDENT_COLUMNS, LIVE);
        let student = sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(student)
    }

    async fn find_by_national_id(
        &self,
        national_id: &str,
    ) -> Result<Option<Student>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM students WHERE national_id = $1 AND {} ORDER BY id LIMIT 1",
            STUDENT_COLUMNS, LIVE
        );
        let student = sqlx::query_as::<_, Student>(&sql)
            .bind(national_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(student)
    }

    async fn insert(&self, payload: StudentPayload) -> Result<Student, DatabaseError> {
        let sql = format!(
            "INSERT INTO students (name, national_id, registration_id) \
             VALUES ($1, $2, $3) RETURNING {}",
            STUDENT_COLUMNS
        );
        let student = sqlx::query_as::<_, Student>(&sql)
            .bind(payload.name)
            .bind(payload.national_id)
            .bind(payload.registration_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(student)
    }

    async fn update(
        &self,
        id: i64,
        payload: StudentPayload,
    ) -> Result<Option<Student>, DatabaseError> {
        let sql = format!(
            "UPDATE students \
             SET name = $2, national_id = $3, registration_id = $4, updated_at = now() \
             WHERE id = $1 AND {} RETURNING {}",
            LIVE, STUDENT_COLUMNS
        );
        let student = sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .bind(payload.name)
            .bind(payload.national_id)
            .bind(payload.registration_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(student)
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let sql = format!(
            "UPDATE students SET deleted_at = now(), updated_at = now() WHERE id = $1 AND {}",
            LIVE
        );
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

/// In-process store with the same soft-delete semantics as the Postgres one.
/// Deleted rows are kept in the map, only hidden.
#[derive(Default)]
pub struct MemoryStudentStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    last_id: i64,
    rows: BTreeMap<i64, Student>,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows including soft-deleted ones
    #[cfg(test)]
    pub(crate) async fn stored_len(&self) -> usize {
        self.inner.read().await.rows.len()
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn list(&self) -> Result<Vec<Student>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.values().filter(|s| !s.is_deleted()).cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Student>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(&id).filter(|s| !s.is_deleted()).cloned())
    }

    async fn find_by_national_id(
        &self,
        national_id: &str,
    ) -> Result<Option<Student>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .values()
            .find(|s| !s.is_deleted() && s.national_id == national_id)
            .cloned())
    }

    async fn insert(&self, payload: StudentPayload) -> Result<Student, DatabaseError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let now = Utc::now();
        let student = Student {
            id: inner.last_id,
            name: payload.name,
            national_id: payload.national_id,
            registration_id: payload.registration_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        inner.rows.insert(student.id, student.clone());
        Ok(student)
    }

    async fn update(
        &self,
        id: i64,
        payload: StudentPayload,
    ) -> Result<Option<Student>, DatabaseError> {
        let mut inner = self.inner.write().await;
        match inner.rows.get_mut(&id) {
            Some(student) if !student.is_deleted() => {
                student.apply(payload, Utc::now());
                Ok(Some(student.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut inner = self.inner.write().await;
        match inner.rows.get_mut(&id) {
            Some(student) if !student.is_deleted() => {
                let now = Utc::now();
                student.deleted_at = Some(now);
                student.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
