//! Application Worker 服务
//!
//! 从 RabbitMQ 消费职位申请消息，幂等地落库为 Processed，
//! 超过投递上限的消息标记 Failed 并路由到死信队列。

use std::sync::Arc;
use std::time::Duration;

use application::{ApplicationProcessor, ApplicationProcessorDependencies, SystemClock};
use config::AppConfig;
use infrastructure::{create_pg_pool, AmqpApplicationConsumer, PgJobApplicationRepository};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// 收到关闭信号后等待在途消息处理完成的时限
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env_with_defaults();

    let pg_pool = create_pg_pool(&config.database.url, config.database.max_connections).await?;
    sqlx::migrate!("../../migrations").run(&pg_pool).await?;

    let processor = Arc::new(ApplicationProcessor::new(ApplicationProcessorDependencies {
        application_repository: Arc::new(PgJobApplicationRepository::new(pg_pool)),
        clock: Arc::new(SystemClock),
        max_delivery_attempts: config.worker.max_delivery_attempts,
    }));

    let consumer_tag = format!("application-worker-{}", std::process::id());
    let consumer = Arc::new(AmqpApplicationConsumer::new(
        &config.amqp,
        &config.worker,
        consumer_tag,
        processor,
    ));

    info!(
        queue = %config.amqp.application_queue,
        dead_letter_queue = %config.amqp.dead_letter_queue(),
        max_delivery_attempts = config.worker.max_delivery_attempts,
        "Application Worker 启动"
    );

    let mut run_handle = {
        let consumer = Arc::clone(&consumer);
        tokio::spawn(async move { consumer.run().await })
    };

    tokio::select! {
        result = &mut run_handle => {
            match result {
                Ok(Ok(())) => info!("消费循环正常退出"),
                Ok(Err(e)) => {
                    error!(error = %e, "消费循环异常退出");
                    return Err(e.into());
                }
                Err(e) => {
                    error!(error = %e, "消费任务 panic");
                    return Err(e.into());
                }
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("收到关闭信号，等待当前消息处理完成");
            consumer.request_shutdown();
            // 消费循环只在投递间隙检查关闭标志，空队列时可能一直阻塞
            if tokio::time::timeout(SHUTDOWN_GRACE, &mut run_handle)
                .await
                .is_err()
            {
                run_handle.abort();
            }
        }
    }

    Ok(())
}
