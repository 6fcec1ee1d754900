//! RabbitMQ 申请消息消费者
//!
//! 支持优雅关闭和断线重连的消费循环。每条投递交给与 broker 无关的
//! `ApplicationProcessor`，其返回的决策在这里映射为 broker 操作：
//! `Ack` → basic_ack；`Requeue` → basic_nack(requeue)；`DeadLetter` →
//! 先确认死信发布成功，再 ack 原消息——发布失败则 nack 重投，绝不丢弃。

use application::{ApplicationProcessor, ProcessingOutcome};
use config::{AmqpConfig, WorkerConfig};
use futures_util::StreamExt;
use lapin::message::Delivery;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicPublishOptions, BasicQosOptions,
    ConfirmSelectOptions,
};
use lapin::publisher_confirm::Confirmation;
use lapin::types::{AMQPValue, FieldTable};
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use super::{declare_queues, AmqpError, AmqpResult};

/// 每个消费者的未确认消息上限
const PREFETCH_COUNT: u16 = 16;

/// 重连退避上限
const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(30);

/// RabbitMQ 申请消息消费者
///
/// 可以水平扩展：多个实例消费同一队列，broker 保证一条消息同一时刻只
/// 投递给一个消费者；幂等 upsert 使重投和并发都安全。
pub struct AmqpApplicationConsumer {
    url: String,
    queue: String,
    dead_letter_queue: String,
    consumer_tag: String,
    reconnect_backoff: Duration,
    processor: Arc<ApplicationProcessor>,
    shutdown_signal: Arc<AtomicBool>,
}

impl AmqpApplicationConsumer {
    pub fn new(
        amqp: &AmqpConfig,
        worker: &WorkerConfig,
        consumer_tag: impl Into<String>,
        processor: Arc<ApplicationProcessor>,
    ) -> Self {
        Self {
            url: amqp.url.clone(),
            queue: amqp.application_queue.clone(),
            dead_letter_queue: amqp.dead_letter_queue(),
            consumer_tag: consumer_tag.into(),
            reconnect_backoff: Duration::from_millis(worker.reconnect_backoff_ms),
            processor,
            shutdown_signal: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 请求停止消费循环（当前消息处理完后退出）
    pub fn request_shutdown(&self) {
        self.shutdown_signal.store(true, Ordering::SeqCst);
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown_signal.load(Ordering::SeqCst)
    }

    /// 运行消费循环直到收到关闭请求；断线后带抖动退避重连
    pub async fn run(&self) -> AmqpResult<()> {
        let mut attempt = 0u32;
        while !self.is_shutdown() {
            match self.consume_until_disconnect().await {
                Ok(()) => break,
                Err(e) => {
                    attempt += 1;
                    let delay = self.reconnect_delay(attempt);
                    error!(
                        error = %e,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "消费循环中断，稍后重连"
                    );
                    sleep(delay).await;
                }
            }
        }
        info!(consumer_tag = %self.consumer_tag, "消费者已停止");
        Ok(())
    }

    /// 带随机抖动的指数退避，避免多实例同时重连
    fn reconnect_delay(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(6);
        let base = self.reconnect_backoff.saturating_mul(1 << exp);
        let capped = base.min(MAX_RECONNECT_DELAY);
        let jitter_ms = rand::rng().random_range(0..=capped.as_millis() as u64 / 2);
        capped + Duration::from_millis(jitter_ms)
    }

    async fn consume_until_disconnect(&self) -> AmqpResult<()> {
        let connection = Connection::connect(&self.url, ConnectionProperties::default())
            .await
            .map_err(|e| AmqpError::connection(e.to_string()))?;
        let channel = connection.create_channel().await?;
        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await?;
        declare_queues(&channel, &self.queue, &self.dead_letter_queue).await?;
        channel
            .basic_qos(PREFETCH_COUNT, BasicQosOptions::default())
            .await?;

        let mut consumer = channel
            .basic_consume(
                &self.queue,
                &self.consumer_tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;

        info!(
            queue = %self.queue,
            consumer_tag = %self.consumer_tag,
            "Application Worker 开始监听申请消息"
        );

        while let Some(delivery) = consumer.next().await {
            if self.is_shutdown() {
                return Ok(());
            }
            let delivery = delivery?;
            self.handle_delivery(&channel, delivery).await?;
        }

        if self.is_shutdown() {
            Ok(())
        } else {
            Err(AmqpError::connection("消费流意外结束"))
        }
    }

    async fn handle_delivery(&self, channel: &Channel, delivery: Delivery) -> AmqpResult<()> {
        let count = delivery_count(&delivery);
        debug!(delivery_count = count, "收到申请消息");

        match self.processor.process(&delivery.data, count).await {
            ProcessingOutcome::Ack => {
                // 持久化已确认，此刻 ack 才是安全的
                delivery.ack(BasicAckOptions::default()).await?;
            }
            ProcessingOutcome::Requeue => {
                delivery
                    .nack(BasicNackOptions {
                        requeue: true,
                        ..Default::default()
                    })
                    .await?;
            }
            ProcessingOutcome::DeadLetter => {
                self.dead_letter(channel, delivery).await?;
            }
        }
        Ok(())
    }

    /// 把消息发布到死信队列，确认成功后再 ack 原消息
    async fn dead_letter(&self, channel: &Channel, delivery: Delivery) -> AmqpResult<()> {
        let published = async {
            let confirm = channel
                .basic_publish(
                    "",
                    &self.dead_letter_queue,
                    BasicPublishOptions::default(),
                    &delivery.data,
                    BasicProperties::default().with_delivery_mode(2),
                )
                .await?
                .await?;
            if let Confirmation::Nack(_) = confirm {
                return Err(AmqpError::publish("死信发布被 broker 拒绝"));
            }
            Ok(())
        }
        .await;

        match published {
            Ok(()) => {
                warn!(queue = %self.dead_letter_queue, "消息已路由到死信队列");
                delivery.ack(BasicAckOptions::default()).await?;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "死信发布失败，消息重新入队");
                delivery
                    .nack(BasicNackOptions {
                        requeue: true,
                        ..Default::default()
                    })
                    .await?;
                Ok(())
            }
        }
    }
}

/// broker 维护的投递次数（首次投递为 1）
///
/// quorum 队列在重投时携带 `x-delivery-count` 头，值为此前的投递次数。
fn delivery_count(delivery: &Delivery) -> u64 {
    delivery
        .properties
        .headers()
        .as_ref()
        .and_then(|headers| {
            headers
                .inner()
                .iter()
                .find(|(key, _)| key.as_str() == "x-delivery-count")
                .map(|(_, value)| value)
        })
        .and_then(|value| match value {
            AMQPValue::LongLongInt(n) => Some(*n as u64),
            AMQPValue::LongInt(n) => Some(*n as u64),
            AMQPValue::LongUInt(n) => Some(*n as u64),
            _ => None,
        })
        .map(|prior| prior + 1)
        .unwrap_or(1)
}
