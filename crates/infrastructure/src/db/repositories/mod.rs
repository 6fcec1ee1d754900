//! PostgreSQL 仓储实现

mod job_application_repository_impl;
mod job_repository_impl;
mod training_repository_impl;
mod user_repository_impl;

pub use job_application_repository_impl::PgJobApplicationRepository;
pub use job_repository_impl::PgJobRepository;
pub use training_repository_impl::PgTrainingRepository;
pub use user_repository_impl::PgUserRepository;

use application::RepositoryError;

/// 统一的 sqlx 错误映射：唯一约束冲突与其余存储错误分开
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err {
        // 23505 = unique_violation
        if db_err.code().as_deref() == Some("23505") {
            return RepositoryError::Conflict;
        }
    }
    RepositoryError::storage(err.to_string())
}
