//! 职位目录服务
//!
//! 读路径带缓存：未命中时回源 Postgres 并以固定 TTL 回填，即使某次失效
//! 丢失，过期窗口也会兜底。写路径在同一逻辑操作内做粗粒度失效：删除
//! 全量列表键和所有 homepage 快照键。

use std::sync::Arc;
use std::time::Duration;

use domain::{Job, Training};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    cache::{cache_keys, CacheStore},
    error::ApplicationError,
    repository::{JobRepository, TrainingRepository},
};

/// homepage 聚合快照：按地点筛选的职位与培训课程各取前几条
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomepageContent {
    pub jobs: Vec<Job>,
    pub trainings: Vec<Training>,
}

/// 新增职位请求
#[derive(Debug, Clone)]
pub struct CreateJobRequest {
    pub title: String,
    pub company: String,
    pub location: String,
    pub industry: String,
}

pub struct CatalogServiceDependencies {
    pub job_repository: Arc<dyn JobRepository>,
    pub training_repository: Arc<dyn TrainingRepository>,
    pub cache: Arc<dyn CacheStore>,
    pub cache_ttl: Duration,
}

pub struct CatalogService {
    deps: CatalogServiceDependencies,
}

/// homepage 快照中职位/培训各自的条数上限
const HOMEPAGE_SECTION_LIMIT: i64 = 2;

impl CatalogService {
    pub fn new(deps: CatalogServiceDependencies) -> Self {
        Self { deps }
    }

    /// 全量职位列表，带缓存
    pub async fn list_jobs(&self) -> Result<Vec<Job>, ApplicationError> {
        if let Some(jobs) = self.cached(cache_keys::ALL_JOBS).await {
            return Ok(jobs);
        }

        let jobs = self.deps.job_repository.list_all().await?;
        self.repopulate(cache_keys::ALL_JOBS, &jobs).await;
        Ok(jobs)
    }

    /// homepage 聚合内容，按地点区分缓存键
    pub async fn homepage_content(
        &self,
        location: Option<&str>,
    ) -> Result<HomepageContent, ApplicationError> {
        let key = cache_keys::homepage(location);
        if let Some(content) = self.cached(&key).await {
            return Ok(content);
        }

        let jobs = self
            .deps
            .job_repository
            .list_by_location(location, HOMEPAGE_SECTION_LIMIT)
            .await?;
        let trainings = self
            .deps
            .training_repository
            .list_by_location(location, HOMEPAGE_SECTION_LIMIT)
            .await?;

        let content = HomepageContent { jobs, trainings };
        self.repopulate(&key, &content).await;
        Ok(content)
    }

    /// 新增职位并失效依赖它的全部缓存键
    pub async fn add_job(&self, request: CreateJobRequest) -> Result<Job, ApplicationError> {
        let job = Job::new(
            request.title,
            request.company,
            request.location,
            request.industry,
        )?;
        let stored = self.deps.job_repository.insert(job).await?;

        // 粗粒度失效：删聚合键，不做局部修补
        self.deps.cache.delete(cache_keys::ALL_JOBS).await?;
        self.deps
            .cache
            .delete_prefix(cache_keys::HOMEPAGE_PREFIX)
            .await?;

        debug!(job_id = %stored.id, "职位已创建，目录缓存已失效");
        Ok(stored)
    }

    /// 读缓存并反序列化；未命中、缓存不可用或快照损坏都按未命中处理
    async fn cached<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.deps.cache.get(key).await {
            Ok(Some(snapshot)) => match serde_json::from_str(&snapshot) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(key = %key, error = %e, "缓存快照损坏，回源重建");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "缓存读取失败，降级回源");
                None
            }
        }
    }

    /// 回填缓存；失败只降级不报错，TTL 会兜底
    async fn repopulate<T: Serialize>(&self, key: &str, value: &T) {
        let snapshot = match serde_json::to_string(value) {
            Ok(s) => s,
            Err(e) => {
                warn!(key = %key, error = %e, "缓存快照序列化失败");
                return;
            }
        };
        if let Err(e) = self
            .deps
            .cache
            .set_with_expiry(key, &snapshot, self.deps.cache_ttl)
            .await
        {
            warn!(key = %key, error = %e, "缓存回填失败");
        }
    }
}
