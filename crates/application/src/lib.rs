//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务，处理输入校验、写入与发布的顺序约束，
//! 以及对外部适配器（存储、消息队列、缓存、密码哈希）的抽象。

pub mod cache;
pub mod clock;
pub mod error;
pub mod password;
pub mod queue;
pub mod repository;
pub mod services;
pub mod worker;

pub use cache::{cache_keys, CacheError, CacheStore};
pub use clock::{Clock, SystemClock};
pub use error::ApplicationError;
pub use password::{PasswordHasher, PasswordHasherError};
pub use queue::{ApplicationMessage, ApplicationQueue, QueueError};
pub use repository::{
    JobApplicationRepository, JobRepository, RepositoryError, RepositoryResult,
    TrainingRepository, UserRepository,
};
pub use services::{
    AuthenticateUserRequest, CatalogService, CatalogServiceDependencies, CreateJobRequest,
    HomepageContent, RegisterUserRequest, SubmissionAccepted, SubmissionService,
    SubmissionServiceDependencies, UserService, UserServiceDependencies,
};
pub use worker::{ApplicationProcessor, ApplicationProcessorDependencies, ProcessingOutcome};
