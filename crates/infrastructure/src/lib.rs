//! 基础设施层实现。
//!
//! 提供数据库仓储、RabbitMQ 生产者/消费者、Redis 缓存、密码哈希等适配器，
//! 实现应用层定义的端口。

pub mod amqp;
pub mod db;
pub mod password;
pub mod redis_cache;
pub mod retry;

pub use amqp::{AmqpApplicationConsumer, AmqpApplicationQueue, AmqpError};
pub use db::{
    create_pg_pool, DbPool, PgJobApplicationRepository, PgJobRepository, PgTrainingRepository,
    PgUserRepository,
};
pub use password::BcryptPasswordHasher;
pub use redis_cache::RedisCache;
pub use retry::{retry_async, Backoff, RetryConfig};
