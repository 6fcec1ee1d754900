//! 缓存端口定义
//!
//! 读路径在未命中时回源重建并带 TTL 回填；写路径做粗粒度失效——
//! 直接删除聚合键而不尝试局部修补。

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 缓存操作错误
#[derive(Debug, Error)]
pub enum CacheError {
    /// 连接错误
    #[error("缓存连接错误: {message}")]
    Connection { message: String },

    /// 操作错误
    #[error("缓存操作错误: {message}")]
    Operation { message: String },
}

impl CacheError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn operation(message: impl Into<String>) -> Self {
        Self::Operation {
            message: message.into(),
        }
    }
}

/// 键值缓存端口
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), CacheError>;
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
    /// 删除指定前缀下的全部键（用于 homepage 快照的粗粒度失效）
    async fn delete_prefix(&self, prefix: &str) -> Result<(), CacheError>;
}

/// 缓存键约定
///
/// 键由查询形状推导，任何职位写入都会同步失效这里的全部聚合键。
pub mod cache_keys {
    /// 全量职位列表快照
    pub const ALL_JOBS: &str = "jobs:all";

    /// homepage 快照键前缀
    pub const HOMEPAGE_PREFIX: &str = "homepage:";

    /// 按地点区分的 homepage 快照键
    pub fn homepage(location: Option<&str>) -> String {
        format!("{}{}", HOMEPAGE_PREFIX, location.unwrap_or("all"))
    }
}
