//! 职位仓储实现

use application::{JobRepository, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::Job;
use sqlx::{query_as, FromRow};
use uuid::Uuid;

use super::map_sqlx_error;
use crate::db::DbPool;

/// 数据库职位模型
#[derive(Debug, Clone, FromRow)]
struct DbJob {
    id: Uuid,
    title: String,
    company: String,
    location: String,
    industry: String,
    created_at: DateTime<Utc>,
}

impl From<DbJob> for Job {
    fn from(row: DbJob) -> Self {
        Job {
            id: row.id,
            title: row.title,
            company: row.company,
            location: row.location,
            industry: row.industry,
            created_at: row.created_at,
        }
    }
}

/// 职位仓储实现
pub struct PgJobRepository {
    pool: DbPool,
}

impl PgJobRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn insert(&self, job: Job) -> RepositoryResult<Job> {
        let row = query_as::<_, DbJob>(
            r#"
            INSERT INTO jobs (id, title, company, location, industry, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, company, location, industry, created_at
            "#,
        )
        .bind(job.id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.industry)
        .bind(job.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Job>> {
        let rows = query_as::<_, DbJob>(
            r#"
            SELECT id, title, company, location, industry, created_at
            FROM jobs
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn list_by_location(
        &self,
        location: Option<&str>,
        limit: i64,
    ) -> RepositoryResult<Vec<Job>> {
        let rows = query_as::<_, DbJob>(
            r#"
            SELECT id, title, company, location, industry, created_at
            FROM jobs
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

        Ok(rows.into_iter().map(Job::from).collect())
    }
}
