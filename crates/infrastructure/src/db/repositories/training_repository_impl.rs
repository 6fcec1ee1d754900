//! 培训课程仓储实现

use application::{RepositoryResult, TrainingRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::Training;
use sqlx::{query_as, FromRow};
use uuid::Uuid;

use super::map_sqlx_error;
use crate::db::DbPool;

/// 数据库培训课程模型
#[derive(Debug, Clone, FromRow)]
struct DbTraining {
    id: Uuid,
    course_name: String,
    provider: String,
    location: String,
    created_at: DateTime<Utc>,
}

impl From<DbTraining> for Training {
    fn from(row: DbTraining) -> Self {
        Training {
            id: row.id,
            course_name: row.course_name,
            provider: row.provider,
            location: row.location,
            created_at: row.created_at,
        }
    }
}

/// 培训课程仓储实现
pub struct PgTrainingRepository {
    pool: DbPool,
}

impl PgTrainingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrainingRepository for PgTrainingRepository {
    async fn list_by_location(
        &self,
        location: Option<&str>,
        limit: i64,
    ) -> RepositoryResult<Vec<Training>> {
        let rows = query_as::<_, DbTraining>(
            r#"
            SELECT id, course_name, provider, location, created_at
            FROM trainings
            WHERE $1::text IS NULL OR location = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(location)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Training::from).collect())
    }
}
