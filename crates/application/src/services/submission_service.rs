//! 申请提交服务（producer 侧）
//!
//! 顺序约束是这里的全部要点：先持久化 `Pending` 记录，成功后才发布消息，
//! 绝不发布没有对应持久化记录的消息（避免孤儿处理）。发布失败时记录保持
//! `Pending`，调用方可以安全重试——写入步骤本身是幂等的。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    clock::Clock,
    error::ApplicationError,
    queue::{ApplicationMessage, ApplicationQueue},
    repository::JobApplicationRepository,
};

/// 提交已受理的回执
///
/// 返回给调用方时 worker 尚未处理，这里不携带处理结果。
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionAccepted {
    pub applicant_id: Uuid,
    pub posting_id: Uuid,
    pub submitted_at: DateTime<Utc>,
}

pub struct SubmissionServiceDependencies {
    pub application_repository: Arc<dyn JobApplicationRepository>,
    pub queue: Arc<dyn ApplicationQueue>,
    pub clock: Arc<dyn Clock>,
}

pub struct SubmissionService {
    deps: SubmissionServiceDependencies,
}

impl SubmissionService {
    pub fn new(deps: SubmissionServiceDependencies) -> Self {
        Self { deps }
    }

    /// 受理一次职位申请。
    ///
    /// 调用方身份已在上游完成认证；posting_id 不做同步校验（延迟到 worker）。
    /// 发布成功即返回，不等待 worker 处理。
    pub async fn submit(
        &self,
        applicant_id: Uuid,
        posting_id: Uuid,
    ) -> Result<SubmissionAccepted, ApplicationError> {
        let now = self.deps.clock.now();

        // 写前置：记录已存在时保持原样（重复投递按普通成功处理）
        let record = self
            .deps
            .application_repository
            .upsert_pending(applicant_id, posting_id, now)
            .await?;

        debug!(
            applicant_id = %applicant_id,
            posting_id = %posting_id,
            status = %record.status,
            "申请记录已持久化"
        );

        // 持久化成功后才发布；失败时记录保持 Pending，等待重试或对账
        self.deps
            .queue
            .publish(&ApplicationMessage::new(applicant_id, posting_id))
            .await?;

        info!(
            applicant_id = %applicant_id,
            posting_id = %posting_id,
            "申请已入队"
        );

        Ok(SubmissionAccepted {
            applicant_id,
            posting_id,
            submitted_at: record.submitted_at,
        })
    }
}
