//! 培训课程实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 培训课程实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Training {
    /// 课程唯一ID
    pub id: Uuid,
    /// 课程名称
    pub course_name: String,
    /// 培训机构
    pub provider: String,
    /// 开课地点
    pub location: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl Training {
    /// 创建新培训课程
    pub fn new(
        course_name: impl Into<String>,
        provider: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            course_name: course_name.into(),
            provider: provider.into(),
            location: location.into(),
            created_at: Utc::now(),
        }
    }
}
