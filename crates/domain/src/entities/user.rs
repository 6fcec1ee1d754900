//! 用户实体定义
//!
//! 用户的注册与凭证校验属于外部协作方，管线本身只依赖用户ID。

use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// 用户唯一ID
    pub id: Uuid,
    /// 姓名
    pub name: String,
    /// 邮箱（唯一）
    pub email: String,
    /// 密码哈希（敏感信息，不在序列化中包含）
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl User {
    /// 创建新用户
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let email = email.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation_error("name", "姓名不能为空"));
        }
        if !email.contains('@') {
            return Err(DomainError::validation_error("email", "邮箱格式不正确"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_name_and_email() {
        assert!(User::new("", "a@b.com", "hash").is_err());
        assert!(User::new("Alice", "not-an-email", "hash").is_err());
        assert!(User::new("Alice", "alice@example.com", "hash").is_ok());
    }
}
