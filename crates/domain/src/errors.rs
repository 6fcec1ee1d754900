//! 领域模型错误定义
//!
//! 定义了系统中所有可能的错误类型，提供清晰的错误上下文。

use thiserror::Error;

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 验证错误
    #[error("验证失败: {field}: {message}")]
    ValidationError { field: String, message: String },

    /// 资源不存在错误
    #[error("资源不存在: {resource_type} ID {resource_id}")]
    ResourceNotFound {
        resource_type: String,
        resource_id: String,
    },

    /// 资源已存在错误
    #[error("资源已存在: {resource_type} {identifier}")]
    ResourceAlreadyExists {
        resource_type: String,
        identifier: String,
    },

    /// 非法状态迁移
    #[error("非法状态迁移: {from} -> {to}")]
    InvalidStatusTransition { from: String, to: String },
}

impl DomainError {
    /// 创建验证错误
    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 创建资源不存在错误
    pub fn resource_not_found(
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
        }
    }

    /// 创建资源已存在错误
    pub fn resource_already_exists(
        resource_type: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self::ResourceAlreadyExists {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
        }
    }
}

/// 领域层结果类型
pub type DomainResult<T> = Result<T, DomainError>;
