//! RabbitMQ 消息队列模块
//!
//! 提供申请消息的生产者和消费者实现。主队列声明为 durable 的 quorum 队列
//! （broker 据此维护投递计数），并成对声明死信队列；声明是幂等的，
//! 生产者与消费者谁先启动都可以。

pub mod consumer;
pub mod error;
pub mod producer;

// 重新导出
pub use consumer::*;
pub use error::*;
pub use producer::*;

use lapin::options::QueueDeclareOptions;
use lapin::types::{AMQPValue, FieldTable};
use lapin::Channel;

/// 幂等声明主队列与死信队列
pub(crate) async fn declare_queues(
    channel: &Channel,
    queue: &str,
    dead_letter_queue: &str,
) -> Result<(), AmqpError> {
    let mut args = FieldTable::default();
    args.insert("x-queue-type".into(), AMQPValue::LongString("quorum".into()));

    channel
        .queue_declare(
            queue,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            args,
        )
        .await?;

    channel
        .queue_declare(
            dead_letter_queue,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;

    Ok(())
}
