//! 存储端口定义
//!
//! 申请记录仓储是整个管线的串行化点：`upsert` 按自然键原子执行，
//! 多个并发 worker 无需额外加锁。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{ApplicationStatus, Job, JobApplication, Training, User};
use thiserror::Error;
use uuid::Uuid;

/// 仓储错误类型
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// 资源未找到
    #[error("资源未找到")]
    NotFound,
    /// 唯一约束冲突
    #[error("资源冲突")]
    Conflict,
    /// 存储错误（视为瞬时，worker 侧触发重投）
    #[error("存储错误: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// 仓储结果类型
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// 职位申请仓储
///
/// 两个 upsert 都以 (applicant_id, posting_id) 自然键为冲突目标，
/// 保证同一键下至多一条记录。
#[async_trait]
pub trait JobApplicationRepository: Send + Sync {
    /// 幂等写入 `Pending` 记录。
    ///
    /// 记录已存在时保持原样（`submitted_at` 与现有状态都不被覆盖），
    /// 返回当前持久化的记录。重复投递因此不是错误。
    async fn upsert_pending(
        &self,
        applicant_id: Uuid,
        posting_id: Uuid,
        submitted_at: DateTime<Utc>,
    ) -> RepositoryResult<JobApplication>;

    /// 原子地将记录迁移到目标状态。
    ///
    /// 记录缺失时防御性创建（producer 的写入可能丢失）；
    /// 已处于终态的记录保持不变（单调迁移），返回持久化后的记录。
    async fn upsert_status(
        &self,
        applicant_id: Uuid,
        posting_id: Uuid,
        status: ApplicationStatus,
        submitted_at: DateTime<Utc>,
    ) -> RepositoryResult<JobApplication>;

    /// 按自然键查找
    async fn find(
        &self,
        applicant_id: Uuid,
        posting_id: Uuid,
    ) -> RepositoryResult<Option<JobApplication>>;
}

/// 职位仓储
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn insert(&self, job: Job) -> RepositoryResult<Job>;
    async fn list_all(&self) -> RepositoryResult<Vec<Job>>;
    /// 按地点筛选（`None` 表示不筛选），限制返回条数
    async fn list_by_location(
        &self,
        location: Option<&str>,
        limit: i64,
    ) -> RepositoryResult<Vec<Job>>;
}

/// 培训课程仓储
#[async_trait]
pub trait TrainingRepository: Send + Sync {
    async fn list_by_location(
        &self,
        location: Option<&str>,
        limit: i64,
    ) -> RepositoryResult<Vec<Training>>;
}

/// 用户仓储
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> RepositoryResult<User>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
}
