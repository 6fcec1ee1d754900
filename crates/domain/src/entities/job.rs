//! 职位实体定义

use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 职位实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// 职位唯一ID
    pub id: Uuid,
    /// 职位名称
    pub title: String,
    /// 公司名称
    pub company: String,
    /// 工作地点
    pub location: String,
    /// 行业
    pub industry: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// 创建新职位
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        location: impl Into<String>,
        industry: impl Into<String>,
    ) -> DomainResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation_error("title", "职位名称不能为空"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            company: company.into(),
            location: location.into(),
            industry: industry.into(),
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_title() {
        assert!(Job::new("  ", "Acme", "Berlin", "Tech").is_err());
        assert!(Job::new("Backend Engineer", "Acme", "Berlin", "Tech").is_ok());
    }
}
