//! RabbitMQ 消息生产者
//!
//! 每个服务实例持有自己的可重连通道，连接状态不是进程级全局量；
//! 通道失效时在下一次发布前显式重建。发布开启 publisher confirm，
//! 消息落盘（delivery_mode=2）且 broker 确认后才算成功。

use application::{ApplicationMessage, ApplicationQueue, QueueError};
use async_trait::async_trait;
use config::AmqpConfig;
use lapin::options::{BasicPublishOptions, ConfirmSelectOptions};
use lapin::publisher_confirm::Confirmation;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::{declare_queues, AmqpError, AmqpResult};
use crate::retry::{retry_async, Backoff, RetryConfig};

/// 发布重试次数（瞬时故障在进程内先行重试，仍失败才上抛给调用方）
const PUBLISH_ATTEMPTS: u32 = 3;

/// RabbitMQ 申请消息生产者
pub struct AmqpApplicationQueue {
    url: String,
    queue: String,
    dead_letter_queue: String,
    channel: Mutex<Option<Channel>>,
}

impl AmqpApplicationQueue {
    /// 创建生产者并预先建立通道、声明队列
    pub async fn connect(config: &AmqpConfig) -> AmqpResult<Self> {
        let producer = Self {
            url: config.url.clone(),
            queue: config.application_queue.clone(),
            dead_letter_queue: config.dead_letter_queue(),
            channel: Mutex::new(None),
        };
        producer.ensure_channel().await?;
        info!(queue = %producer.queue, "RabbitMQ 生产者就绪");
        Ok(producer)
    }

    /// 返回可用通道，必要时重建连接
    async fn ensure_channel(&self) -> AmqpResult<Channel> {
        let mut guard = self.channel.lock().await;
        if let Some(channel) = guard.as_ref() {
            if channel.status().connected() {
                return Ok(channel.clone());
            }
            warn!("RabbitMQ 通道已失效，重建连接");
        }

        let connection = Connection::connect(&self.url, ConnectionProperties::default())
            .await
            .map_err(|e| AmqpError::connection(e.to_string()))?;
        let channel = connection.create_channel().await?;
        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await?;
        declare_queues(&channel, &self.queue, &self.dead_letter_queue).await?;

        *guard = Some(channel.clone());
        Ok(channel)
    }

    /// 废弃当前通道，下次发布前重建
    async fn invalidate_channel(&self) {
        *self.channel.lock().await = None;
    }

    async fn publish_once(&self, payload: &[u8]) -> AmqpResult<()> {
        let channel = self.ensure_channel().await?;

        let result = async {
            let confirm = channel
                .basic_publish(
                    "",
                    &self.queue,
                    BasicPublishOptions::default(),
                    payload,
                    BasicProperties::default().with_delivery_mode(2),
                )
                .await?
                .await?;
            if let Confirmation::Nack(_) = confirm {
                return Err(AmqpError::publish("broker 拒绝了消息 (nack)"));
            }
            Ok(())
        }
        .await;

        if result.is_err() {
            self.invalidate_channel().await;
        }
        result
    }
}

#[async_trait]
impl ApplicationQueue for AmqpApplicationQueue {
    async fn publish(&self, message: &ApplicationMessage) -> Result<(), QueueError> {
        let payload = message.encode()?;
        retry_async(
            RetryConfig {
                max_attempts: PUBLISH_ATTEMPTS,
                backoff: Backoff::exponential(Duration::from_millis(100)),
            },
            || self.publish_once(&payload),
        )
        .await
        .map_err(QueueError::from)
    }
}
