//! 领域实体定义
//!
//! 包含系统的核心实体：用户、职位、培训课程、职位申请。

pub mod job;
pub mod job_application;
pub mod training;
pub mod user;

// 重新导出核心实体
pub use job::Job;
pub use job_application::{ApplicationStatus, JobApplication};
pub use training::Training;
pub use user::User;
