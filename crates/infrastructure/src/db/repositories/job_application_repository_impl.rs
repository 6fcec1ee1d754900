//! 职位申请仓储实现
//!
//! 两个 upsert 都是单条原子语句，以 (applicant_id, posting_id) 唯一索引为
//! 冲突目标。它们是整个管线的串行化点：并发 worker 对同一自然键的写入
//! 由数据库按行串行。

use application::{JobApplicationRepository, RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{ApplicationStatus, JobApplication};
use sqlx::{query_as, FromRow};
use uuid::Uuid;

use super::map_sqlx_error;
use crate::db::DbPool;

/// 数据库申请记录模型
#[derive(Debug, Clone, FromRow)]
struct DbJobApplication {
    applicant_id: Uuid,
    posting_id: Uuid,
    submitted_at: DateTime<Utc>,
    status: String,
}

impl TryFrom<DbJobApplication> for JobApplication {
    type Error = RepositoryError;

    fn try_from(row: DbJobApplication) -> Result<Self, Self::Error> {
        let status: ApplicationStatus = row
            .status
            .parse()
            .map_err(|e: domain::DomainError| RepositoryError::storage(e.to_string()))?;
        Ok(JobApplication {
            applicant_id: row.applicant_id,
            posting_id: row.posting_id,
            submitted_at: row.submitted_at,
            status,
        })
    }
}

/// 职位申请仓储实现
pub struct PgJobApplicationRepository {
    pool: DbPool,
}

impl PgJobApplicationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobApplicationRepository for PgJobApplicationRepository {
    async fn upsert_pending(
        &self,
        applicant_id: Uuid,
        posting_id: Uuid,
        submitted_at: DateTime<Utc>,
    ) -> RepositoryResult<JobApplication> {
        // 空更新（status 赋回自身）让 RETURNING 在冲突时也返回现有行，
        // 现有记录的 submitted_at 与状态都保持不变。
        let row = query_as::<_, DbJobApplication>(
            r#"
            INSERT INTO job_applications (applicant_id, posting_id, submitted_at, status)
            VALUES ($1, $2, $3, 'pending')
            ON CONFLICT (applicant_id, posting_id)
            DO UPDATE SET status = job_applications.status
            RETURNING applicant_id, posting_id, submitted_at, status
            "#,
        )
        .bind(applicant_id)
        .bind(posting_id)
        .bind(submitted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.try_into()
    }

    async fn upsert_status(
        &self,
        applicant_id: Uuid,
        posting_id: Uuid,
        status: ApplicationStatus,
        submitted_at: DateTime<Utc>,
    ) -> RepositoryResult<JobApplication> {
        // 单调迁移在 SQL 内完成：只有 pending 记录接受新状态，
        // 终态保持不变；记录缺失时防御性创建。
        let row = query_as::<_, DbJobApplication>(
            r#"
            INSERT INTO job_applications (applicant_id, posting_id, submitted_at, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (applicant_id, posting_id)
            DO UPDATE SET status = CASE
                WHEN job_applications.status = 'pending' THEN EXCLUDED.status
                ELSE job_applications.status
            END
            RETURNING applicant_id, posting_id, submitted_at, status
            "#,
        )
        .bind(applicant_id)
        .bind(posting_id)
        .bind(submitted_at)
        .bind(status.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.try_into()
    }

    async fn find(
        &self,
        applicant_id: Uuid,
        posting_id: Uuid,
    ) -> RepositoryResult<Option<JobApplication>> {
        let row = query_as::<_, DbJobApplication>(
            r#"
            SELECT applicant_id, posting_id, submitted_at, status
            FROM job_applications
            WHERE applicant_id = $1 AND posting_id = $2
            "#,
        )
        .bind(applicant_id)
        .bind(posting_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(JobApplication::try_from).transpose()
    }
}
