//! 职位申请实体定义
//!
//! 申请记录以 (applicant_id, posting_id) 作为自然键，同一键下至多存在一条记录；
//! 重复投递通过 upsert 更新而非新增。状态迁移是单向的：
//! `Pending` 只能进入 `Processed` 或 `Failed`，终态不可回退。

use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 申请处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    /// 已入队，等待 worker 处理
    Pending,
    /// worker 处理完成
    Processed,
    /// 处理失败（毒消息或重试耗尽），进入死信
    Failed,
}

impl ApplicationStatus {
    /// 状态迁移是否合法（单调，终态不回退）
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        match (self, next) {
            (s, n) if s == n => true,
            (ApplicationStatus::Pending, _) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationStatus::Pending => write!(f, "pending"),
            ApplicationStatus::Processed => write!(f, "processed"),
            ApplicationStatus::Failed => write!(f, "failed"),
        }
    }
}

impl Default for ApplicationStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "processed" => Ok(ApplicationStatus::Processed),
            "failed" => Ok(ApplicationStatus::Failed),
            other => Err(DomainError::validation_error(
                "status",
                format!("未知的申请状态: {}", other),
            )),
        }
    }
}

/// 职位申请记录
///
/// 由 producer 在请求时以 `Pending` 创建，仅由 worker 迁移到 `Processed` 或
/// `Failed`；本管线不删除记录（保留为审计轨迹）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    /// 申请人ID（自然键之一）
    pub applicant_id: Uuid,
    /// 职位ID（自然键之一）
    pub posting_id: Uuid,
    /// 首次提交时间，创建后不可变
    pub submitted_at: DateTime<Utc>,
    /// 处理状态
    pub status: ApplicationStatus,
}

impl JobApplication {
    /// 创建待处理的申请记录
    pub fn pending(applicant_id: Uuid, posting_id: Uuid, submitted_at: DateTime<Utc>) -> Self {
        Self {
            applicant_id,
            posting_id,
            submitted_at,
            status: ApplicationStatus::Pending,
        }
    }

    /// 迁移到目标状态，拒绝回退终态
    pub fn transition_to(&mut self, next: ApplicationStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}
