//! 消息队列端口定义
//!
//! 队列消息是显式的带校验载荷：解码失败走毒消息路径，而不是在消费回调里
//! 隐式地假定消息形状。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// 申请消息载荷
///
/// 载荷必须足以重建目标申请记录的自然键，使重投后的幂等处理成为可能。
/// 投递计数由 broker 维护，不进入载荷。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationMessage {
    pub applicant_id: Uuid,
    pub posting_id: Uuid,
}

impl ApplicationMessage {
    pub fn new(applicant_id: Uuid, posting_id: Uuid) -> Self {
        Self {
            applicant_id,
            posting_id,
        }
    }

    /// 编码为 JSON 字节串
    pub fn encode(&self) -> Result<Vec<u8>, QueueError> {
        serde_json::to_vec(self).map_err(|e| QueueError::Encode {
            message: e.to_string(),
        })
    }

    /// 从 JSON 字节串解码；失败即为毒消息
    pub fn decode(payload: &[u8]) -> Result<Self, QueueError> {
        serde_json::from_slice(payload).map_err(|e| QueueError::Decode {
            message: e.to_string(),
        })
    }
}

/// 队列操作错误
#[derive(Debug, Error)]
pub enum QueueError {
    /// 消息编码失败
    #[error("消息编码失败: {message}")]
    Encode { message: String },

    /// 消息解码失败（毒消息）
    #[error("消息解码失败: {message}")]
    Decode { message: String },

    /// broker 不可用或发布失败（瞬时）
    #[error("消息队列错误: {message}")]
    Broker { message: String },
}

impl QueueError {
    pub fn broker(message: impl Into<String>) -> Self {
        Self::Broker {
            message: message.into(),
        }
    }
}

/// 申请消息发布端口
///
/// producer 仅在对应记录持久化成功后才调用 `publish`（write-before-publish）。
#[async_trait]
pub trait ApplicationQueue: Send + Sync {
    async fn publish(&self, message: &ApplicationMessage) -> Result<(), QueueError>;
}
